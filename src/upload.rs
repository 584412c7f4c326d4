use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, ProgressCallback};
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::events::AppEvent;
use crate::types::{DocumentFile, UploadedDocument};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Success { filename: String },
    Failed { error: String },
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Success { .. } | UploadStatus::Failed { .. })
    }
}

/// Snapshot of the coordinator's single upload slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadTask {
    pub file_name: Option<String>,
    /// 0–100, never decreases while uploading.
    pub progress: u8,
    pub status: UploadStatus,
    attempt: u64,
}

impl UploadTask {
    pub fn is_uploading(&self) -> bool {
        self.status == UploadStatus::Uploading
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Please select a smaller file! {name} is {size} bytes, the limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("Please select a PDF file ({name} is not one)")]
    NotPdf { name: String },
    #[error("another upload is still in progress")]
    Busy,
    #[error("Upload failed: {0}")]
    Api(#[from] ApiError),
}

impl UploadError {
    /// Rejections decided locally, before any request was made.
    pub fn is_validation(&self) -> bool {
        !matches!(self, UploadError::Api(_))
    }
}

/// Transfers one document at a time and publishes progress on a watch channel.
///
/// Cloning yields another handle to the same upload slot.
#[derive(Clone)]
pub struct UploadCoordinator {
    api: Arc<ApiClient>,
    state: Arc<watch::Sender<UploadTask>>,
    max_bytes: u64,
}

impl UploadCoordinator {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self::with_limit(api, DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn with_limit(api: Arc<ApiClient>, max_bytes: u64) -> Self {
        let (state, _) = watch::channel(UploadTask::default());
        Self {
            api,
            state: Arc::new(state),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Last value wins; intermediate progress values may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<UploadTask> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> UploadTask {
        self.state.borrow().clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.state.borrow().is_uploading()
    }

    pub fn validate(&self, file: &DocumentFile) -> Result<(), UploadError> {
        if !file.is_pdf() {
            return Err(UploadError::NotPdf {
                name: file.name().to_string(),
            });
        }
        if file.size_bytes() > self.max_bytes {
            return Err(UploadError::TooLarge {
                name: file.name().to_string(),
                size: file.size_bytes(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Clears a finished or failed task back to idle. No effect while uploading.
    pub fn reset(&self) {
        self.state.send_if_modified(|task| {
            if task.status.is_terminal() {
                *task = UploadTask {
                    attempt: task.attempt,
                    ..UploadTask::default()
                };
                true
            } else {
                false
            }
        });
    }

    pub async fn upload(&self, file: DocumentFile) -> Result<UploadedDocument, UploadError> {
        self.validate(&file)?;
        let attempt = self.start(file.name())?;
        info!(name = file.name(), size = file.size_bytes(), "upload started");

        let result = self.api.upload(&file, self.progress_callback(attempt)).await;
        match result {
            Ok(response) => {
                let filename = response.filename;
                self.finish(attempt, UploadStatus::Success {
                    filename: filename.clone(),
                });
                info!(%filename, "upload finished");
                self.api.events().emit(AppEvent::DocumentsChanged {
                    filename: filename.clone(),
                });
                Ok(UploadedDocument {
                    filename,
                    size_bytes: file.size_bytes(),
                    uploaded_at: OffsetDateTime::now_utc(),
                    preview: file.source().map(|path| path.to_path_buf()),
                })
            }
            Err(err) => {
                warn!(name = file.name(), "upload failed: {err}");
                self.finish(attempt, UploadStatus::Failed {
                    error: err.message.clone(),
                });
                Err(UploadError::Api(err))
            }
        }
    }

    fn start(&self, file_name: &str) -> Result<u64, UploadError> {
        let mut attempt = None;
        self.state.send_if_modified(|task| {
            if task.is_uploading() {
                return false;
            }
            let next = task.attempt + 1;
            *task = UploadTask {
                file_name: Some(file_name.to_string()),
                progress: 0,
                status: UploadStatus::Uploading,
                attempt: next,
            };
            attempt = Some(next);
            true
        });
        attempt.ok_or(UploadError::Busy)
    }

    fn finish(&self, attempt: u64, status: UploadStatus) {
        self.state.send_if_modified(|task| {
            if task.attempt != attempt || !task.is_uploading() {
                return false;
            }
            task.progress = match status {
                UploadStatus::Success { .. } => 100,
                _ => 0,
            };
            task.status = status;
            true
        });
    }

    fn progress_callback(&self, attempt: u64) -> ProgressCallback {
        let state = Arc::clone(&self.state);
        Arc::new(move |sent: u64, total: u64| {
            let percent = progress_percent(sent, total);
            state.send_if_modified(|task| {
                // Stale attempts, terminal states and regressions are dropped.
                if task.attempt != attempt || !task.is_uploading() || percent <= task.progress {
                    return false;
                }
                task.progress = percent;
                true
            });
        })
    }
}

fn progress_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (sent.min(total).saturating_mul(100) / total) as u8
}
