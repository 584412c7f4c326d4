//! API module for the DrQA backend
//!
//! # Architecture
//!
//! - `DocumentBackend` - transport seam; one method per backend endpoint
//! - `http` - reqwest implementation with a cookie-backed session
//! - `client` - `ApiClient` adapter: identity cache and 401 handling on top of any backend
//!
//! # Usage
//!
//! ```rust,no_run
//! use drqa::api::ApiClient;
//! use drqa::config::ClientConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = ApiClient::http(&ClientConfig::load()?)?;
//! let answer = api.query("What is in the report?").await?;
//! println!("{}", answer.answer().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod http;
pub mod models;

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::{DocumentFile, UserProfile};
use models::{
    ComprehensiveQuery, ComprehensiveQueryResponse, FileListResponse, FileUploadResponse,
    HealthStatus, HistoryExport, LoginResponse, MessageResponse, PublicInfo, QueryResponse,
    UserCreate, UserLogin, UserQuery,
};

pub use client::ApiClient;
pub use error::{ApiError, ApiResult, NETWORK_ERROR};
pub use http::HttpBackend;

/// Called with `(bytes_sent, total_bytes)` as the transport consumes an upload body.
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn register(&self, user: &UserCreate) -> ApiResult<UserProfile>;
    async fn login(&self, credentials: &UserLogin) -> ApiResult<LoginResponse>;
    async fn logout(&self) -> ApiResult<MessageResponse>;
    async fn profile(&self) -> ApiResult<UserProfile>;
    async fn list_files(&self) -> ApiResult<FileListResponse>;
    async fn upload_file(
        &self,
        file: &DocumentFile,
        on_progress: ProgressCallback,
    ) -> ApiResult<FileUploadResponse>;
    async fn remove_file(&self, filename: &str) -> ApiResult<MessageResponse>;
    async fn download_file(&self, filename: &str) -> ApiResult<Vec<u8>>;
    async fn query(&self, query: &UserQuery) -> ApiResult<QueryResponse>;
    async fn query_comprehensive(
        &self,
        query: &ComprehensiveQuery,
    ) -> ApiResult<ComprehensiveQueryResponse>;
    async fn download_conversations(&self, export: &HistoryExport) -> ApiResult<Vec<u8>>;
    async fn health(&self) -> ApiResult<HealthStatus>;
    async fn public_info(&self) -> ApiResult<PublicInfo>;
}
