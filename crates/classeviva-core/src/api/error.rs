use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated - no token present")]
    TokenMissing,

    #[error("Token expired - authenticate again")]
    TokenExpired,

    #[error("Token rejected by the server")]
    TokenInvalid,

    #[error("Password does not match for account {0}")]
    InvalidCredential(String),

    #[error("Profile data not available for account {0}")]
    NoProfileData(String),

    #[error("Missing data in response: {0}")]
    MissingData(String),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Resource not found: {body}")]
    NotFound { body: String },

    #[error("Request failed with status {status}: {body}")]
    RemoteRequestFailed { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Generic mapping for a non-success response with no endpoint-specific meaning.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = Self::truncate_body(body);
        match status.as_u16() {
            404 => ApiError::NotFound { body },
            _ => ApiError::RemoteRequestFailed {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// HTTP status of the remote failure, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::RemoteRequestFailed { status, .. } => Some(*status),
            ApiError::InvalidCredential(_) => Some(422),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RemoteErrorBody {
    error: Option<String>,
}

/// Extract the remote error code (e.g. `"120/bad date"`) from a JSON error body.
pub(crate) fn remote_error_code(body: &str) -> Option<String> {
    serde_json::from_str::<RemoteErrorBody>(body).ok()?.error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_distinguishes_not_found() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "gone");
        assert!(matches!(err, ApiError::NotFound { ref body } if body == "gone"));
        assert_eq!(err.status(), Some(404));

        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(
            err,
            ApiError::RemoteRequestFailed { status: 500, ref body } if body == "boom"
        ));
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 520 total bytes)"));

        // Never split a multi-byte character
        let accented = "è".repeat(MAX_ERROR_BODY_LENGTH);
        let truncated = ApiError::truncate_body(&accented);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_remote_error_code() {
        let body = r#"{"statusCode":404,"error":"120/date format","message":"bad"}"#;
        assert_eq!(remote_error_code(body).as_deref(), Some("120/date format"));
        assert_eq!(remote_error_code(r#"{"statusCode":404}"#), None);
        assert_eq!(remote_error_code("<html>not json</html>"), None);
    }
}
