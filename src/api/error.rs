use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Fallback message when the token endpoint gives no detail
const LOGIN_FALLBACK: &str = "Login failed";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The token endpoint rejected the request. Displays the server's
    /// `detail` message verbatim when one was provided.
    #[error("{}", .detail.as_deref().unwrap_or(LOGIN_FALLBACK))]
    LoginRejected { detail: Option<String> },

    #[error("Unauthorized - log in first")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Shape of an error body from the API: `{"detail": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Error for a non-success response from the token endpoint.
    /// Extracts the server's `detail` field when the body carries one.
    pub fn login_rejection(status: reqwest::StatusCode, body: &str) -> Self {
        warn!(status = %status, "Token endpoint rejected login");
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .filter(|d| !d.is_empty());
        ApiError::LoginRejected { detail }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_login_rejection_uses_server_detail() {
        let err = ApiError::login_rejection(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Invalid credentials"}"#,
        );
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_login_rejection_fallback_without_detail() {
        for body in ["{}", "", "not json", r#"{"detail": ""}"#] {
            let err = ApiError::login_rejection(StatusCode::BAD_REQUEST, body);
            assert_eq!(err.to_string(), "Login failed", "body: {:?}", body);
        }
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "gone"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
    }

    #[test]
    fn test_truncate_body_limits_length() {
        let long_body = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, &long_body);
        assert!(err.to_string().len() < 600);
        assert!(err.to_string().contains("truncated"));
    }
}
