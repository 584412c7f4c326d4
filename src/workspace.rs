use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::api::models::{FileListResponse, HistoryExport, MessageResponse};
use crate::api::{ApiClient, ApiError, ApiResult};
use crate::chat::{ChatController, ChatError, QueryTicket};
use crate::config::ClientConfig;
use crate::downloads::{conversation_export_name, save_bytes};
use crate::events::AppEvent;
use crate::library::DocumentLibrary;
use crate::session::{SessionError, SessionId, SessionStore};
use crate::types::{DocumentFile, MessageId, QueryMode, UploadedDocument, UserProfile};
use crate::upload::{UploadCoordinator, UploadError};

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not save download: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level application state. Views only read from it; every change goes
/// through one of its methods.
pub struct Workspace {
    api: Arc<ApiClient>,
    sessions: SessionStore,
    library: DocumentLibrary,
    profile: Option<UserProfile>,
    chat: ChatController,
    uploads: UploadCoordinator,
    mode: QueryMode,
    banner: Option<String>,
    listing_stale: bool,
    download_dir: PathBuf,
    history_limit: u32,
}

impl Workspace {
    pub fn new(api: Arc<ApiClient>, config: &ClientConfig) -> Self {
        Self {
            sessions: SessionStore::with_title_length(config.title_length),
            library: DocumentLibrary::new(),
            profile: None,
            chat: ChatController::new(Arc::clone(&api)).with_max_tokens(config.max_tokens),
            uploads: UploadCoordinator::with_limit(Arc::clone(&api), config.max_upload_bytes),
            mode: QueryMode::default(),
            banner: None,
            listing_stale: false,
            download_dir: config.resolved_download_dir(),
            history_limit: config.history_limit,
            api,
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn library(&self) -> &DocumentLibrary {
        &self.library
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn chat(&self) -> &ChatController {
        &self.chat
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: QueryMode) {
        self.mode = mode;
    }

    /// Latest error worth showing: a chat failure or a document operation failure.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref().or(self.chat.last_error())
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
        self.chat.dismiss_error();
        self.uploads.reset();
    }

    pub fn show_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    // Sessions

    pub fn new_chat(&mut self) -> SessionId {
        self.banner = None;
        self.chat.dismiss_error();
        self.sessions.create_session()
    }

    pub fn select_chat(&mut self, id: SessionId) -> Result<(), SessionError> {
        self.sessions.select_session(id).inspect_err(|err| {
            debug!(session = %id, "select failed: {err}");
        })
    }

    pub fn delete_chat(&mut self, id: SessionId) -> Result<(), SessionError> {
        self.sessions.delete_session(id).map(|_| ()).inspect_err(|err| {
            debug!(session = %id, "delete failed: {err}");
        })
    }

    /// First half of a send: records the user message and returns the query to run.
    pub fn begin_send(&mut self, text: &str) -> Result<Option<QueryTicket>, ChatError> {
        self.chat
            .set_document_context(self.library.current().is_some());
        self.chat.begin(&mut self.sessions, text, self.mode)
    }

    /// Second half of a send: appends the reply (or the fallback) to the transcript.
    pub fn finish_send(
        &mut self,
        ticket: QueryTicket,
        outcome: Result<String, ApiError>,
    ) -> Option<MessageId> {
        self.chat.complete(&mut self.sessions, ticket, outcome)
    }

    pub async fn send(&mut self, text: &str) -> Result<Option<MessageId>, ChatError> {
        let Some(ticket) = self.begin_send(text)? else {
            return Ok(None);
        };
        let outcome = ticket.dispatch(&self.api).await;
        Ok(self.finish_send(ticket, outcome))
    }

    // Account

    pub fn set_profile(&mut self, profile: Option<UserProfile>) {
        self.profile = profile;
    }

    pub async fn load_profile(&mut self) -> ApiResult<&UserProfile> {
        match self.api.fetch_profile().await {
            Ok(profile) => Ok(self.profile.insert(profile)),
            Err(err) => {
                self.show_banner("Failed to load user profile");
                Err(err)
            }
        }
    }

    pub async fn logout(&mut self) {
        self.api.logout().await;
        self.profile = None;
        info!("logged out");
    }

    pub fn handle_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::LoggedOut => self.profile = None,
            AppEvent::DocumentsChanged { filename } => {
                debug!(%filename, "document listing is stale");
                self.listing_stale = true;
            }
        }
    }

    // Documents

    /// Whether the backend's file list changed since the last refresh.
    pub fn listing_stale(&self) -> bool {
        self.listing_stale
    }

    pub async fn refresh_documents(&mut self) -> ApiResult<()> {
        let listing = self.api.list_documents().await;
        self.finish_refresh(listing)
    }

    /// Applies the outcome of a `/list-files` call.
    pub fn finish_refresh(&mut self, listing: ApiResult<FileListResponse>) -> ApiResult<()> {
        match listing {
            Ok(listing) => {
                self.listing_stale = false;
                self.apply_listing(&listing.files);
                Ok(())
            }
            Err(err) => {
                warn!("listing documents failed: {err}");
                self.show_banner("Failed to load files");
                Err(err)
            }
        }
    }

    /// Merges a `/list-files` result into the library.
    pub fn apply_listing(&mut self, filenames: &[String]) {
        self.library.sync_filenames(filenames);
    }

    pub fn forget_document(&mut self, filename: &str) {
        self.library.remove(filename);
    }

    pub fn select_document(&mut self, filename: &str) -> bool {
        self.library.select(filename).is_ok()
    }

    pub fn close_document(&mut self) {
        self.library.close_current();
    }

    /// Adds a document uploaded through [`UploadCoordinator::upload`] run elsewhere.
    pub fn add_document(&mut self, document: UploadedDocument) {
        self.library.insert(document);
    }

    pub async fn upload_document(
        &mut self,
        file: DocumentFile,
    ) -> Result<UploadedDocument, UploadError> {
        let uploads = self.uploads.clone();
        match uploads.upload(file).await {
            Ok(document) => {
                self.library.insert(document.clone());
                Ok(document)
            }
            Err(err) => {
                self.show_banner(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn remove_document(&mut self, filename: &str) -> ApiResult<()> {
        let outcome = self.api.remove(filename).await;
        self.finish_remove(filename, outcome)
    }

    /// Applies the outcome of a remove call for `filename`.
    pub fn finish_remove(
        &mut self,
        filename: &str,
        outcome: ApiResult<MessageResponse>,
    ) -> ApiResult<()> {
        match outcome {
            Ok(_) => {
                self.forget_document(filename);
                Ok(())
            }
            Err(err) => {
                warn!(%filename, "remove failed: {err}");
                self.show_banner("Failed to remove file");
                Err(err)
            }
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn history_limit(&self) -> u32 {
        self.history_limit
    }

    pub async fn download_document(&mut self, filename: &str) -> Result<PathBuf, DownloadError> {
        let result = fetch_and_save(&self.api, &self.download_dir, filename).await;
        if result.is_err() {
            self.show_banner("Failed to download file");
        }
        result
    }

    /// Saves the backend's conversation history export (a .docx file).
    pub async fn export_history(&mut self) -> Result<PathBuf, DownloadError> {
        let result = export_conversations(&self.api, &self.download_dir, self.history_limit).await;
        if result.is_err() {
            self.show_banner("Failed to download conversation. Please try again.");
        }
        result
    }
}

/// Downloads a stored document into `dir`.
pub async fn fetch_and_save(
    api: &ApiClient,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, DownloadError> {
    let bytes = api.download(filename).await?;
    Ok(save_bytes(dir, filename, &bytes).await?)
}

/// Fetches the conversation history export and saves it under a timestamped name.
pub async fn export_conversations(
    api: &ApiClient,
    dir: &Path,
    limit: u32,
) -> Result<PathBuf, DownloadError> {
    let export = HistoryExport {
        user_id: None,
        limit: Some(limit),
    };
    let bytes = api.download_history(export).await?;
    let name = conversation_export_name(OffsetDateTime::now_utc());
    Ok(save_bytes(dir, &name, &bytes).await?)
}
