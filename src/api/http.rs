use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{
    ComprehensiveQuery, ComprehensiveQueryResponse, FileListResponse, FileUploadResponse,
    HealthStatus, HistoryExport, LoginResponse, MessageResponse, PublicInfo, QueryResponse,
    UserCreate, UserLogin, UserQuery,
};
use super::{ApiError, ApiResult, DocumentBackend, ProgressCallback};
use crate::config::ClientConfig;
use crate::types::{DocumentFile, UserProfile};

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// reqwest transport; the session cookie lives in the client's cookie store.
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut base = Url::parse(&config.api_base)
            .map_err(|err| ApiError::new(format!("Invalid API base URL: {err}"), None))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(format!("Invalid endpoint {path}: {err}"), None))
    }

    /// `prefix/<filename>` with the filename escaped as a single path segment.
    fn file_endpoint(&self, prefix: &str, filename: &str) -> ApiResult<Url> {
        let mut url = self.endpoint(prefix)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::new("API base URL cannot carry a path", None))?
            .pop_if_empty()
            .push(filename);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|err| ApiError::new(format!("Invalid response: {err}"), Some(status.as_u16())))
    }

    async fn read_bytes(response: Response) -> ApiResult<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn register(&self, user: &UserCreate) -> ApiResult<UserProfile> {
        self.post_json("auth/register", user).await
    }

    async fn login(&self, credentials: &UserLogin) -> ApiResult<LoginResponse> {
        self.post_json("auth/login", credentials).await
    }

    async fn logout(&self) -> ApiResult<MessageResponse> {
        let url = self.endpoint("auth/logout")?;
        let response = self.client.post(url).send().await?;
        Self::read_json(response).await
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.get_json("auth/profile").await
    }

    async fn list_files(&self) -> ApiResult<FileListResponse> {
        self.get_json("list-files").await
    }

    async fn upload_file(
        &self,
        file: &DocumentFile,
        on_progress: ProgressCallback,
    ) -> ApiResult<FileUploadResponse> {
        let total = file.size_bytes();
        let chunks: Vec<Vec<u8>> = file
            .bytes()
            .chunks(UPLOAD_CHUNK_BYTES)
            .map(<[u8]>::to_vec)
            .collect();

        // Progress is reported as each chunk is handed to the transport.
        let mut sent = 0u64;
        let body = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            on_progress(sent, total);
            Ok::<_, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file.name().to_string())
            .mime_str(file.content_type())?;
        let form = Form::new().part("file", part);

        let url = self.endpoint("upload-file")?;
        debug!(%url, name = file.name(), total, "upload");
        let response = self.client.post(url).multipart(form).send().await?;
        Self::read_json(response).await
    }

    async fn remove_file(&self, filename: &str) -> ApiResult<MessageResponse> {
        let url = self.file_endpoint("remove-file/", filename)?;
        debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await?;
        Self::read_json(response).await
    }

    async fn download_file(&self, filename: &str) -> ApiResult<Vec<u8>> {
        let url = self.file_endpoint("download-file/", filename)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::read_bytes(response).await
    }

    async fn query(&self, query: &UserQuery) -> ApiResult<QueryResponse> {
        self.post_json("comprehensive-query", query).await
    }

    async fn query_comprehensive(
        &self,
        query: &ComprehensiveQuery,
    ) -> ApiResult<ComprehensiveQueryResponse> {
        self.post_json("comprehensive-query", query).await
    }

    async fn download_conversations(&self, export: &HistoryExport) -> ApiResult<Vec<u8>> {
        let url = self.endpoint("download-conversations")?;
        debug!(%url, ?export, "GET");
        let response = self.client.get(url).query(export).send().await?;
        Self::read_bytes(response).await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_json("health").await
    }

    async fn public_info(&self) -> ApiResult<PublicInfo> {
        self.get_json("public/info").await
    }
}
