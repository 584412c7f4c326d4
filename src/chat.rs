use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::models::ComprehensiveQuery;
use crate::api::{ApiClient, ApiError, ApiResult};
use crate::config::DEFAULT_MAX_TOKENS;
use crate::session::{SessionId, SessionStore};
use crate::types::{MessageDraft, MessageId, QueryMode};

/// Transcript entry appended when a query fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("still waiting for a reply in {0}")]
    AwaitingReply(SessionId),
}

/// A query that has been recorded in the transcript but not yet answered.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryTicket {
    session: SessionId,
    query: String,
    mode: QueryMode,
    use_pdf_context: bool,
    max_tokens: u32,
}

impl QueryTicket {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Issues exactly one backend query and returns the answer text.
    pub async fn dispatch(&self, api: &ApiClient) -> ApiResult<String> {
        debug!(session = %self.session, mode = ?self.mode, "dispatching query");
        match self.mode {
            QueryMode::Simple => {
                let response = api.query(self.query.clone()).await?;
                response
                    .answer()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::new("Response did not contain an answer", None))
            }
            QueryMode::Comprehensive => {
                let request = ComprehensiveQuery {
                    query: self.query.clone(),
                    use_pdf_context: self.use_pdf_context,
                    generate_comprehensive: true,
                    max_tokens: self.max_tokens,
                };
                Ok(api.query_comprehensive(request).await?.comprehensive_answer)
            }
        }
    }
}

/// Turns user input into a question/answer exchange in the active session.
pub struct ChatController {
    api: Arc<ApiClient>,
    awaiting: HashSet<SessionId>,
    last_error: Option<String>,
    use_pdf_context: bool,
    max_tokens: u32,
}

impl ChatController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            awaiting: HashSet::new(),
            last_error: None,
            use_pdf_context: false,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Whether comprehensive queries should ask the backend to use the current PDF.
    pub fn set_document_context(&mut self, enabled: bool) {
        self.use_pdf_context = enabled;
    }

    pub fn is_awaiting(&self, session: SessionId) -> bool {
        self.awaiting.contains(&session)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Records the user message in the active session and hands back the query to run.
    ///
    /// Returns `Ok(None)` without touching the store when no session is active.
    pub fn begin(
        &mut self,
        store: &mut SessionStore,
        text: &str,
        mode: QueryMode,
    ) -> Result<Option<QueryTicket>, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let Some(session) = store.active_id() else {
            return Ok(None);
        };
        if self.is_awaiting(session) {
            return Err(ChatError::AwaitingReply(session));
        }

        if store
            .append_message(session, MessageDraft::user(text).with_mode(mode))
            .is_err()
        {
            return Ok(None);
        }
        self.awaiting.insert(session);
        self.last_error = None;

        Ok(Some(QueryTicket {
            session,
            query: text.to_string(),
            mode,
            use_pdf_context: self.use_pdf_context,
            max_tokens: self.max_tokens,
        }))
    }

    /// Appends the reply for `ticket`. A session deleted in the meantime is skipped silently.
    pub fn complete(
        &mut self,
        store: &mut SessionStore,
        ticket: QueryTicket,
        outcome: Result<String, ApiError>,
    ) -> Option<MessageId> {
        self.awaiting.remove(&ticket.session);

        let reply = match outcome {
            Ok(answer) => MessageDraft::assistant(answer).with_mode(ticket.mode),
            Err(err) => {
                warn!(session = %ticket.session, "query failed: {err}");
                self.last_error = Some(format!("Failed to get response: {}", err.message));
                MessageDraft::assistant(FALLBACK_REPLY)
            }
        };

        match store.append_message(ticket.session, reply) {
            Ok(message) => Some(message.id),
            Err(_) => {
                debug!(session = %ticket.session, "session gone, reply dropped");
                None
            }
        }
    }

    /// `begin`, `dispatch` and `complete` in one go.
    pub async fn send_message(
        &mut self,
        store: &mut SessionStore,
        text: &str,
        mode: QueryMode,
    ) -> Result<Option<MessageId>, ChatError> {
        let Some(ticket) = self.begin(store, text, mode)? else {
            return Ok(None);
        };
        let outcome = ticket.dispatch(&self.api).await;
        Ok(self.complete(store, ticket, outcome))
    }
}
