use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Error returned by the backend for a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub data: Option<Value>,
}

impl ApiError {
    /// Build an error from a failed response's status and raw body.
    ///
    /// The message is the body's `detail` field when the body is JSON. A JSON
    /// body without a usable `detail` (missing, null, `false`, `0`, `""`)
    /// yields the generic status message, and a body that is not JSON at all
    /// falls back to the status text.
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        let fallback = format!("HTTP error! status: {}", status.as_u16());

        match serde_json::from_slice::<Value>(body) {
            Ok(data) => {
                let message = data
                    .get("detail")
                    .and_then(detail_message)
                    .unwrap_or(fallback);
                Self {
                    status,
                    message,
                    data: Some(data),
                }
            }
            // reqwest doesn't keep the reason phrase the server sent, so the
            // canonical one for the code stands in for it.
            Err(_) => Self {
                status,
                message: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or(fallback),
                data: None,
            },
        }
    }
}

/// Text for a `detail` value, or `None` when it carries nothing to show.
fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Error)]
pub enum DatalisApiError {
    #[error("{0}")]
    Backend(#[from] ApiError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl DatalisApiError {
    /// The backend error, if this failure came from a non-2xx response.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.api_error().map(|err| err.status)
    }
}
