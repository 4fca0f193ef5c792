//! Traffic error types

use thiserror::Error;

/// Errors that can occur while computing routes
#[derive(Debug, Error)]
pub enum TrafficError {
    /// Neither a routes key nor a general Google key is configured
    #[error("Traffic API key not configured")]
    NotConfigured,

    /// Connection to the routes service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the routes service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the routes service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The API answered but returned no route
    #[error("No routes found from {from} to {to}")]
    NoRoutesFound {
        /// Origin address
        from: String,
        /// Destination address
        to: String,
    },

    /// Blank origin or destination
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl TrafficError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(TrafficError::ConnectionFailed("reset".to_string()).is_retryable());
        assert!(TrafficError::ServiceUnavailable("HTTP 503".to_string()).is_retryable());
        assert!(TrafficError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(
            TrafficError::RateLimitExceeded {
                retry_after_secs: None
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!TrafficError::NotConfigured.is_retryable());
        assert!(!TrafficError::ParseError("eof".to_string()).is_retryable());
        assert!(!TrafficError::RequestFailed("HTTP 400".to_string()).is_retryable());
        assert!(
            !TrafficError::NoRoutesFound {
                from: "A".to_string(),
                to: "B".to_string(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = TrafficError::NoRoutesFound {
            from: "Seattle".to_string(),
            to: "Honolulu".to_string(),
        };
        assert_eq!(err.to_string(), "No routes found from Seattle to Honolulu");

        let err = TrafficError::RateLimitExceeded {
            retry_after_secs: Some(30),
        };
        assert!(err.to_string().contains("30"));
    }
}
