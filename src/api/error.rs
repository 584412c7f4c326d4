use reqwest::StatusCode;
use serde_json::Value;

pub const NETWORK_ERROR: &str = "Network error - please check your connection";
const GENERIC_ERROR: &str = "An error occurred";

/// Normalised failure of any backend call.
///
/// `status_code` is `None` when no response arrived (transport failure).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status_code: Option<u16>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    pub fn network(detail: impl std::fmt::Display) -> Self {
        tracing::debug!(%detail, "transport failure");
        Self::new(NETWORK_ERROR, None)
    }

    pub fn unauthorized() -> Self {
        Self::new("Not authenticated", Some(StatusCode::UNAUTHORIZED.as_u16()))
    }

    /// Builds an error from a non-2xx response, preferring the backend's `detail`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        Self::new(extract_detail(body), Some(status.as_u16()))
    }

    pub fn is_network(&self) -> bool {
        self.status_code.is_none()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::new(err.to_string(), Some(status.as_u16())),
            None if err.is_decode() => Self::new(format!("Invalid response: {err}"), None),
            None => Self::network(err),
        }
    }
}

fn extract_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        let trimmed = body.trim();
        return if trimmed.is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            trimmed.to_string()
        };
    };

    match value.get("detail") {
        Some(Value::String(detail)) => return detail.clone(),
        // Validation errors arrive as a list of {loc, msg, type}
        Some(Value::Array(items)) => {
            if let Some(msg) = items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
            {
                return msg.to_string();
            }
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}
