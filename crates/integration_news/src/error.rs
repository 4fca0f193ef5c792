//! News error types

use thiserror::Error;

/// Errors that can occur while fetching headlines
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("News API key not configured")]
    NotConfigured,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// NewsAPI rejected the key (`apiKeyInvalid`, `apiKeyDisabled`, ...)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NewsError::Unauthorized("apiKeyInvalid".to_string()).to_string(),
            "Unauthorized: apiKeyInvalid"
        );
        assert!(NewsError::NotConfigured.to_string().contains("not configured"));
    }
}
