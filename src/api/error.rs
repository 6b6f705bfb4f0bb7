use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape used by the backend for rejections
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

impl ApiError {
    /// Extract the backend's `detail` message from an error body, falling
    /// back to the (truncated) raw body when it is not the expected JSON.
    fn detail_from_body(body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<ErrorDetail>(body) {
            return parsed.detail;
        }
        Self::truncate_body(body)
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back off to a char boundary so multi-byte text cannot split
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::detail_from_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(detail),
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    /// The human-readable message shown to a user for this failure.
    pub fn detail(&self) -> String {
        match self {
            ApiError::AccessDenied(d)
            | ApiError::Unauthorized(d)
            | ApiError::NotFound(d)
            | ApiError::ServerError(d) => d.clone(),
            other => other.to_string(),
        }
    }
}
