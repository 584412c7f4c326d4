use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Which backend query variant a message was sent with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Simple,
    #[default]
    Comprehensive,
}

impl QueryMode {
    pub fn label(self) -> &'static str {
        match self {
            QueryMode::Simple => "Simple",
            QueryMode::Comprehensive => "Comprehensive",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub origin: Role,
    pub timestamp: OffsetDateTime,
    pub mode: Option<QueryMode>,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.origin == Role::User
    }
}

/// Message content handed to the session store, which assigns id and timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageDraft {
    pub origin: Role,
    pub text: String,
    pub mode: Option<QueryMode>,
}

impl MessageDraft {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Role::User,
            text: text.into(),
            mode: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            origin: Role::Assistant,
            text: text.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadedDocument {
    pub filename: String,
    pub size_bytes: u64,
    pub uploaded_at: OffsetDateTime,
    /// Local copy of the file, used to open the document in a viewer.
    pub preview: Option<PathBuf>,
}

/// A file picked by the user, not yet sent to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
    source: Option<PathBuf>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
            source: None,
        }
    }

    /// Builds a file from raw bytes, inferring the content type from the extension.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self::new(name, content_type, bytes)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();
        let mut file = Self::from_bytes(name, bytes);
        file.source = Some(path.to_path_buf());
        Ok(file)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(PDF_MIME) || has_pdf_extension(&self.name)
    }
}

fn has_pdf_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn content_type_for(name: &str) -> &'static str {
    if has_pdf_extension(name) {
        PDF_MIME
    } else {
        "application/octet-stream"
    }
}
