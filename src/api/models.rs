//! Request and response bodies of the DrQA backend.

use crate::types::UserProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub user: UserProfile,
}

/// Plain `{message}` acknowledgements (logout, remove-file).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FileUploadResponse {
    #[serde(default)]
    pub message: String,
    pub filename: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserQuery {
    pub query: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComprehensiveQuery {
    pub query: String,
    pub use_pdf_context: bool,
    pub generate_comprehensive: bool,
    pub max_tokens: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FormattedResponse {
    #[serde(default)]
    pub main_answer: String,
    #[serde(default)]
    pub full_response: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub numbered_points: Vec<String>,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub has_structure: bool,
}

/// Answer to a plain `{query}` request.
///
/// `/comprehensive-query` answers with `comprehensive_answer`; older
/// deployments answer with `response`. Both are accepted.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub comprehensive_answer: Option<String>,
    #[serde(default)]
    pub pdf_filename: Option<String>,
    #[serde(default)]
    pub pdf_context_used: bool,
    #[serde(default)]
    pub formatted_response: Option<FormattedResponse>,
    #[serde(default)]
    pub relevant_docs: Vec<String>,
    #[serde(default)]
    pub total_sources: u32,
    #[serde(default)]
    pub user: Option<String>,
}

impl QueryResponse {
    /// The answer text, whichever field carried it.
    pub fn answer(&self) -> Option<&str> {
        self.response
            .as_deref()
            .or(self.comprehensive_answer.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PdfSource {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ComprehensiveQueryResponse {
    #[serde(default)]
    pub query: String,
    pub comprehensive_answer: String,
    #[serde(default)]
    pub pdf_filename: Option<String>,
    #[serde(default)]
    pub pdf_context_used: bool,
    #[serde(default)]
    pub pdf_sources: Vec<PdfSource>,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub combined_insights: Option<Value>,
}

/// Parameters of the conversation history export.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HistoryExport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PublicInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub authentication_required: bool,
}
