#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, watch};

use drqa::api::models::{
    ComprehensiveQuery, ComprehensiveQueryResponse, FileListResponse, FileUploadResponse,
    HealthStatus, HistoryExport, LoginResponse, MessageResponse, PublicInfo, QueryResponse,
    UserCreate, UserLogin, UserQuery,
};
use drqa::api::{ApiClient, ApiError, ApiResult, DocumentBackend, ProgressCallback};
use drqa::types::{DocumentFile, UserProfile};
use drqa::upload::UploadTask;

/// Scripted in-memory backend.
///
/// Query answers are served from a queue; an empty queue answers `"ok"`.
#[derive(Default)]
pub struct MockBackend {
    answers: Mutex<VecDeque<ApiResult<String>>>,
    upload_result: Mutex<Option<ApiResult<FileUploadResponse>>>,
    upload_steps: Mutex<Vec<(u64, u64)>>,
    upload_gate: Mutex<Option<Arc<Notify>>>,
    upload_observer: Mutex<Option<watch::Receiver<UploadTask>>>,
    observed_progress: Mutex<Vec<u8>>,
    progress: Mutex<Option<ProgressCallback>>,
    logout_error: Mutex<Option<ApiError>>,
    files: Mutex<Vec<String>>,
    comprehensive_requests: Mutex<Vec<ComprehensiveQuery>>,
    simple_as_comprehensive: Mutex<bool>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn answer(&self, reply: ApiResult<String>) {
        self.answers.lock().unwrap().push_back(reply);
    }

    pub fn upload_returns(&self, result: ApiResult<FileUploadResponse>) {
        *self.upload_result.lock().unwrap() = Some(result);
    }

    /// Progress reports the transport makes before the upload completes.
    pub fn upload_reports(&self, steps: &[(u64, u64)]) {
        *self.upload_steps.lock().unwrap() = steps.to_vec();
    }

    /// Holds uploads until the returned handle is notified.
    pub fn hold_uploads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.upload_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Records the task's progress after every reported step.
    pub fn observe(&self, receiver: watch::Receiver<UploadTask>) {
        *self.upload_observer.lock().unwrap() = Some(receiver);
    }

    pub fn observed_progress(&self) -> Vec<u8> {
        self.observed_progress.lock().unwrap().clone()
    }

    /// The progress callback of the most recent upload.
    pub fn last_progress_callback(&self) -> Option<ProgressCallback> {
        self.progress.lock().unwrap().clone()
    }

    pub fn fail_logout(&self, err: ApiError) {
        *self.logout_error.lock().unwrap() = Some(err);
    }

    pub fn set_files(&self, files: &[&str]) {
        *self.files.lock().unwrap() = files.iter().map(|f| f.to_string()).collect();
    }

    pub fn comprehensive_requests(&self) -> Vec<ComprehensiveQuery> {
        self.comprehensive_requests.lock().unwrap().clone()
    }

    /// Answers plain queries the way `/comprehensive-query` does.
    pub fn answer_simple_as_comprehensive(&self) {
        *self.simple_as_comprehensive.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_answer(&self) -> ApiResult<String> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}

#[async_trait]
impl DocumentBackend for MockBackend {
    async fn register(&self, user: &UserCreate) -> ApiResult<UserProfile> {
        self.record("register");
        Ok(profile(&user.username))
    }

    async fn login(&self, credentials: &UserLogin) -> ApiResult<LoginResponse> {
        self.record("login");
        Ok(LoginResponse {
            message: "Login successful".into(),
            user: profile(&credentials.username),
        })
    }

    async fn logout(&self) -> ApiResult<MessageResponse> {
        self.record("logout");
        match self.logout_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(MessageResponse {
                message: "Logout successful".into(),
                status: Some("success".into()),
            }),
        }
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.record("profile");
        Ok(profile("ada"))
    }

    async fn list_files(&self) -> ApiResult<FileListResponse> {
        self.record("list_files");
        Ok(FileListResponse {
            files: self.files.lock().unwrap().clone(),
            ..FileListResponse::default()
        })
    }

    async fn upload_file(
        &self,
        file: &DocumentFile,
        on_progress: ProgressCallback,
    ) -> ApiResult<FileUploadResponse> {
        self.record("upload_file");
        *self.progress.lock().unwrap() = Some(Arc::clone(&on_progress));

        let steps = self.upload_steps.lock().unwrap().clone();
        for (sent, total) in steps {
            on_progress(sent, total);
            let observer = self.upload_observer.lock().unwrap().clone();
            if let Some(receiver) = observer {
                let progress = receiver.borrow().progress;
                self.observed_progress.lock().unwrap().push(progress);
            }
        }

        let gate = self.upload_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.upload_result.lock().unwrap().take().unwrap_or_else(|| {
            Ok(FileUploadResponse {
                message: "File uploaded successfully".into(),
                filename: file.name().to_string(),
                status: "success".into(),
            })
        })
    }

    async fn remove_file(&self, filename: &str) -> ApiResult<MessageResponse> {
        self.record("remove_file");
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f != filename);
        if files.len() == before {
            return Err(ApiError::new("File not found", Some(404)));
        }
        Ok(MessageResponse {
            message: format!("{filename} removed"),
            status: None,
        })
    }

    async fn download_file(&self, filename: &str) -> ApiResult<Vec<u8>> {
        self.record("download_file");
        Ok(format!("%PDF {filename}").into_bytes())
    }

    async fn query(&self, query: &UserQuery) -> ApiResult<QueryResponse> {
        self.record("query");
        let comprehensive = *self.simple_as_comprehensive.lock().unwrap();
        self.next_answer().map(|answer| {
            if comprehensive {
                QueryResponse {
                    query: query.query.clone(),
                    comprehensive_answer: Some(answer),
                    pdf_filename: Some("current.pdf".into()),
                    ..QueryResponse::default()
                }
            } else {
                QueryResponse {
                    response: Some(answer),
                    ..QueryResponse::default()
                }
            }
        })
    }

    async fn query_comprehensive(
        &self,
        query: &ComprehensiveQuery,
    ) -> ApiResult<ComprehensiveQueryResponse> {
        self.record("query_comprehensive");
        self.comprehensive_requests
            .lock()
            .unwrap()
            .push(query.clone());
        self.next_answer()
            .map(|answer| ComprehensiveQueryResponse {
                query: query.query.clone(),
                comprehensive_answer: answer,
                pdf_filename: None,
                pdf_context_used: query.use_pdf_context,
                pdf_sources: Vec::new(),
                response_time: 0.1,
                timestamp: 0.0,
                combined_insights: None,
            })
    }

    async fn download_conversations(&self, _export: &HistoryExport) -> ApiResult<Vec<u8>> {
        self.record("download_conversations");
        Ok(b"PK docx".to_vec())
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.record("health");
        Ok(HealthStatus {
            status: "healthy".into(),
            timestamp: None,
            version: None,
        })
    }

    async fn public_info(&self) -> ApiResult<PublicInfo> {
        self.record("public_info");
        Ok(PublicInfo {
            name: "DrQA".into(),
            description: String::new(),
            features: Vec::new(),
            authentication_required: true,
        })
    }
}

pub fn profile(username: &str) -> UserProfile {
    UserProfile {
        id: format!("id-{username}"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: None,
        is_active: true,
        created_at: "2024-01-15T10:30:00".to_string(),
    }
}

pub fn client(backend: &Arc<MockBackend>) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(Arc::clone(backend) as Arc<dyn DocumentBackend>))
}

pub fn pdf(name: &str, size: usize) -> DocumentFile {
    DocumentFile::from_bytes(name, vec![0u8; size])
}
