//! Process-wide notifications between the API client and interested components.

use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// The backend rejected the session (401); cached identity has been cleared.
    LoggedOut,
    /// The set of stored documents changed on the backend.
    DocumentsChanged { filename: String },
}

/// Broadcast channel; every subscriber sees every event sent after it subscribed.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: AppEvent) {
        tracing::debug!(?event, "emit");
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }
}
