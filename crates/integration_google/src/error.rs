//! Google integration error types

use thiserror::Error;

/// Errors from the Google OAuth, Gmail and Calendar endpoints
#[derive(Debug, Error)]
pub enum GoogleError {
    /// A required credential is missing
    #[error("Google credentials not configured: {0}")]
    NotConfigured(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// The token endpoint refused the grant (revoked or expired refresh token, bad client)
    #[error("Token request rejected: {0}")]
    TokenRejected(String),

    /// The API refused the access token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Client secret file could not be read
    #[error("Credentials file error: {0}")]
    CredentialsFile(String),
}

impl GoogleError {
    /// Map a non-success API status to an error
    pub(crate) fn from_status(status: reqwest::StatusCode, detail: &str) -> Self {
        use reqwest::StatusCode;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Unauthorized(format!("HTTP {status}: {detail}"))
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            s if s.is_server_error() => Self::ServiceUnavailable(format!("HTTP {s}")),
            s => Self::RequestFailed(format!("HTTP {s}: {detail}")),
        }
    }
}
