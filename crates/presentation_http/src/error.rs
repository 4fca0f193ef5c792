//! API error handling
//!
//! Every error renders as `{error, code, details?}`. Outside debug mode,
//! URLs inside details are redacted in place, and details that carry paths
//! or connection info are replaced with a generic message.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

const GENERIC_DETAIL: &str = "An error occurred processing your request";

const REDACTED_URL: &str = "[redacted]";

/// Substrings that suggest a message leaks implementation details
const SENSITIVE_PATTERNS: [&str; 12] = [
    "/home/",
    "/users/",
    "/var/",
    "/etc/",
    "c:\\",
    "stack backtrace",
    "panicked at",
    ".rs:",
    "connection refused",
    "econnrefused",
    "api_key",
    "apikey=",
];

/// Sanitize an error message unless internal details are exposed
pub fn sanitize_error_message(msg: &str, expose: bool) -> String {
    if expose {
        return msg.to_string();
    }

    let redacted = redact_urls(msg);
    let lower = redacted.to_lowercase();
    if SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return GENERIC_DETAIL.to_string();
    }

    redacted
}

/// Replace every `scheme://...` token, keeping surrounding punctuation
fn redact_urls(msg: &str) -> String {
    msg.split(' ')
        .map(|token| {
            let Some(sep) = token.find("://") else {
                return token.to_string();
            };
            let start = token[..sep]
                .char_indices()
                .rev()
                .find(|(_, c)| !(c.is_ascii_alphanumeric() || matches!(*c, '+' | '-' | '.')))
                .map_or(0, |(i, c)| i + c.len_utf8());
            let end = token
                .trim_end_matches([')', ']', ',', ';', ':', '"', '\''])
                .len()
                .max(sep);
            format!("{}{REDACTED_URL}{}", &token[..start], &token[end..])
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Digest generation failed; the message is already sanitized
    #[error("Failed to generate digest: {0}")]
    DigestFailed(String),
}

impl ApiError {
    /// Wrap a failed digest run, keeping its message as the response details
    pub fn digest_failed(err: &ApplicationError, expose: bool) -> Self {
        Self::DigestFailed(sanitize_error_message(&err.to_string(), expose))
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::DigestFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "digest_failed",
                "Failed to generate digest".to_string(),
                Some(msg),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
