//! Smoke client for a running digest server
//!
//! Thin wrappers over the HTTP endpoints plus plain-text rendering of the
//! responses, for checking a deployment by hand.

use std::{fmt::Write as _, time::Duration};

use domain::DigestRequest;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Digests can take a while; the server's own deadline is 120s
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Server { status: StatusCode, message: String },
}

/// Client for the digest HTTP API
#[derive(Debug, Clone)]
pub struct DigestClient {
    client: Client,
    base_url: String,
}

impl DigestClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /health`
    pub async fn status(&self) -> Result<Value, ClientError> {
        let response = self.client.get(self.endpoint("/health")).send().await?;
        Self::json(response).await
    }

    /// `POST /digest`
    pub async fn digest(&self, request: &DigestRequest) -> Result<Value, ClientError> {
        debug!(sources = ?request.enabled_sources(), "Requesting digest");
        let response = self
            .client
            .post(self.endpoint("/digest"))
            .json(request)
            .send()
            .await?;
        Self::json(response).await
    }

    /// `POST /digest/quick`
    pub async fn quick(&self) -> Result<Value, ClientError> {
        let response = self.client.post(self.endpoint("/digest/quick")).send().await?;
        Self::json(response).await
    }

    async fn json(response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = ["details", "error"]
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
            .unwrap_or("no error message")
            .to_string();
        Err(ClientError::Server { status, message })
    }
}

/// Render `/health` as one line per service
#[must_use]
pub fn render_status(health: &Value) -> String {
    let mut out = String::from("Service status:\n");
    if let Some(services) = health.get("services").and_then(Value::as_object) {
        for (name, configured) in services {
            let mark = if configured.as_bool().unwrap_or(false) {
                "configured"
            } else {
                "not configured"
            };
            let _ = writeln!(out, "  {name:<10} {mark}");
        }
    }
    out
}

/// Number of items a `details` entry holds
///
/// Lists count their elements; single records (weather) count as one.
fn item_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map
            .get("routes")
            .and_then(Value::as_array)
            .map_or(1, Vec::len),
        Value::Null => 0,
        _ => 1,
    }
}

/// Render a digest as its summary, per-source counts and warnings
#[must_use]
pub fn render_digest(digest: &Value) -> String {
    let mut out = String::new();

    if let Some(timestamp) = digest.get("timestamp").and_then(Value::as_str) {
        let _ = writeln!(out, "Digest generated at {timestamp}\n");
    }
    let summary = digest.get("summary").and_then(Value::as_str).unwrap_or("(no summary)");
    let _ = writeln!(out, "{summary}\n");

    if let Some(details) = digest.get("details").and_then(Value::as_object) {
        out.push_str("Sources:\n");
        for (source, value) in details {
            let _ = writeln!(out, "  {source:<16} {}", item_count(value));
        }
    }

    if let Some(warnings) = digest.get("warnings").and_then(Value::as_array) {
        out.push_str("\nWarnings:\n");
        for warning in warnings {
            let source = warning.get("source").and_then(Value::as_str).unwrap_or("-");
            let message = warning.get("message").and_then(Value::as_str).unwrap_or("");
            let _ = writeln!(out, "  [{source}] {message}");
        }
    }

    out
}
