use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use super::models::{
    ComprehensiveQuery, ComprehensiveQueryResponse, FileListResponse, FileUploadResponse,
    HealthStatus, HistoryExport, LoginResponse, MessageResponse, PublicInfo, QueryResponse,
    UserCreate, UserLogin, UserQuery,
};
use super::{ApiResult, DocumentBackend, HttpBackend, ProgressCallback};
use crate::config::ClientConfig;
use crate::events::{AppEvent, EventBus};
use crate::types::{DocumentFile, UserProfile};

/// Single point of contact with the backend.
///
/// Wraps a [`DocumentBackend`] and owns the cached identity of the logged-in
/// user. The cache is display-only: it is refreshed by `login` and
/// `fetch_profile` and cleared by `logout` or any 401 response.
pub struct ApiClient {
    backend: Arc<dyn DocumentBackend>,
    identity: Mutex<Option<UserProfile>>,
    events: EventBus,
}

impl ApiClient {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self::with_events(backend, EventBus::new())
    }

    pub fn with_events(backend: Arc<dyn DocumentBackend>, events: EventBus) -> Self {
        Self {
            backend,
            identity: Mutex::new(None),
            events,
        }
    }

    /// Client talking HTTP to the configured backend.
    pub fn http(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self::new(Arc::new(HttpBackend::new(config)?)))
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn cached_user(&self) -> Option<UserProfile> {
        self.identity().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    fn identity(&self) -> std::sync::MutexGuard<'_, Option<UserProfile>> {
        self.identity.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember(&self, user: &UserProfile) {
        *self.identity() = Some(user.clone());
    }

    fn forget(&self) {
        self.identity().take();
    }

    /// Treats a 401 from any call as session expiry.
    fn guard<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(err) = &result
            && err.is_unauthorized()
        {
            warn!("session expired: {}", err.message);
            self.forget();
            self.events.emit(AppEvent::LoggedOut);
        }
        result
    }

    pub async fn register(&self, user: UserCreate) -> ApiResult<UserProfile> {
        let result = self.backend.register(&user).await;
        self.guard(result)
    }

    pub async fn login(&self, credentials: UserLogin) -> ApiResult<LoginResponse> {
        let response = self.guard(self.backend.login(&credentials).await)?;
        info!(user = %response.user.username, "logged in");
        self.remember(&response.user);
        Ok(response)
    }

    /// Always clears the local identity, even when the backend call fails.
    pub async fn logout(&self) -> MessageResponse {
        let result = self.guard(self.backend.logout().await);
        self.forget();
        match result {
            Ok(response) => response,
            Err(err) => {
                warn!("logout call failed: {err}");
                MessageResponse {
                    message: "Logged out locally".to_string(),
                    status: None,
                }
            }
        }
    }

    pub async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        let profile = self.guard(self.backend.profile().await)?;
        self.remember(&profile);
        Ok(profile)
    }

    pub async fn list_documents(&self) -> ApiResult<FileListResponse> {
        self.guard(self.backend.list_files().await)
    }

    pub async fn upload(
        &self,
        file: &DocumentFile,
        on_progress: ProgressCallback,
    ) -> ApiResult<FileUploadResponse> {
        self.guard(self.backend.upload_file(file, on_progress).await)
    }

    pub async fn remove(&self, filename: &str) -> ApiResult<MessageResponse> {
        let response = self.guard(self.backend.remove_file(filename).await)?;
        self.events.emit(AppEvent::DocumentsChanged {
            filename: filename.to_string(),
        });
        Ok(response)
    }

    pub async fn download(&self, filename: &str) -> ApiResult<Vec<u8>> {
        self.guard(self.backend.download_file(filename).await)
    }

    pub async fn query(&self, query: impl Into<String>) -> ApiResult<QueryResponse> {
        let request = UserQuery {
            query: query.into(),
        };
        self.guard(self.backend.query(&request).await)
    }

    pub async fn query_comprehensive(
        &self,
        request: ComprehensiveQuery,
    ) -> ApiResult<ComprehensiveQueryResponse> {
        self.guard(self.backend.query_comprehensive(&request).await)
    }

    pub async fn download_history(&self, export: HistoryExport) -> ApiResult<Vec<u8>> {
        self.guard(self.backend.download_conversations(&export).await)
    }

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.guard(self.backend.health().await)
    }

    pub async fn public_info(&self) -> ApiResult<PublicInfo> {
        self.guard(self.backend.public_info().await)
    }
}
