//! Chat sessions of the current app run. Nothing here is persisted.

use std::fmt;
use time::OffsetDateTime;
use tracing::debug;

use crate::config::DEFAULT_TITLE_LENGTH;
use crate::types::{ChatMessage, MessageDraft, MessageId};

pub const PLACEHOLDER_TITLE: &str = "New Chat";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("chat session {0} not found")]
    NotFound(SessionId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatSession {
    id: SessionId,
    title: String,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Ordered chat sessions plus the identity of the active one.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active: Option<SessionId>,
    next_session: u64,
    next_message: u64,
    title_length: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_title_length(DEFAULT_TITLE_LENGTH)
    }

    /// `title_length` is the number of characters kept from the first message.
    pub fn with_title_length(title_length: usize) -> Self {
        Self {
            sessions: Vec::new(),
            active: None,
            next_session: 1,
            next_message: 1,
            title_length: title_length.max(1),
        }
    }

    /// Appends an empty session and makes it active.
    pub fn create_session(&mut self) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.sessions.push(ChatSession::new(id));
        self.active = Some(id);
        debug!(%id, "session created");
        id
    }

    pub fn select_session(&mut self, id: SessionId) -> Result<(), SessionError> {
        if !self.contains(id) {
            return Err(SessionError::NotFound(id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// Appends a message; the first message of a session also fixes its title.
    pub fn append_message(
        &mut self,
        id: SessionId,
        draft: MessageDraft,
    ) -> Result<&ChatMessage, SessionError> {
        let message_id = MessageId(self.next_message);
        let title_length = self.title_length;
        let session = self
            .sessions
            .iter_mut()
            .find(|session| session.id == id)
            .ok_or(SessionError::NotFound(id))?;
        self.next_message += 1;

        if session.messages.is_empty() {
            session.title = truncate_title(&draft.text, title_length);
        }
        session.messages.push(ChatMessage {
            id: message_id,
            text: draft.text,
            origin: draft.origin,
            timestamp: OffsetDateTime::now_utc(),
            mode: draft.mode,
        });
        let last = session.messages.len() - 1;
        Ok(&session.messages[last])
    }

    /// Removes a session. Deleting the active one leaves no session active.
    pub fn delete_session(&mut self, id: SessionId) -> Result<ChatSession, SessionError> {
        let index = self
            .sessions
            .iter()
            .position(|session| session.id == id)
            .ok_or(SessionError::NotFound(id))?;
        if self.active == Some(id) {
            self.active = None;
        }
        debug!(%id, "session deleted");
        Ok(self.sessions.remove(index))
    }

    pub fn get(&self, id: SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|session| session.id == id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.get(id).is_some()
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn truncate_title(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }
    trimmed.chars().take(max_chars).collect::<String>().trim_end().to_string()
}
