//! Todoist HTTP client
//!
//! Lists active tasks with bearer-token authentication. Cursor pagination is
//! followed up to [`TodoistConfig::max_pages`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{TaskPage, TodoistTask};

/// Todoist client errors
#[derive(Debug, Error)]
pub enum TodoistError {
    #[error("Todoist API token not configured")]
    NotConfigured,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// Token rejected
    #[error("Unauthorized: check the Todoist API token")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Todoist client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoistConfig {
    /// API base URL (default: <https://api.todoist.com/api/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Personal API token
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on followed pagination cursors (default: 5)
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_base_url() -> String {
    "https://api.todoist.com/api/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_pages() -> u32 {
    5
}

impl Default for TodoistConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
        }
    }
}

impl TodoistConfig {
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

/// Task source abstraction
#[async_trait]
pub trait TodoistClient: Send + Sync {
    /// All active tasks visible to the token owner
    async fn active_tasks(&self) -> Result<Vec<TodoistTask>, TodoistError>;

    fn is_configured(&self) -> bool;
}

/// Todoist REST client
#[derive(Debug)]
pub struct TodoistHttpClient {
    client: Client,
    config: TodoistConfig,
}

impl TodoistHttpClient {
    /// Create a new Todoist client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: TodoistConfig) -> Result<Self, TodoistError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TodoistError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn fetch_page(
        &self,
        token: &SecretString,
        cursor: Option<&str>,
    ) -> Result<TaskPage, TodoistError> {
        let url = format!("{}/tasks", self.config.base_url.trim_end_matches('/'));

        let mut request = self.client.get(&url).bearer_auth(token.expose_secret());
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TodoistError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            s if s.is_success() => {},
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(TodoistError::Unauthorized);
            },
            StatusCode::TOO_MANY_REQUESTS => return Err(TodoistError::RateLimitExceeded),
            s if s.is_server_error() => {
                return Err(TodoistError::ServiceUnavailable(format!("HTTP {s}")));
            },
            s => return Err(TodoistError::RequestFailed(format!("HTTP {s}"))),
        }

        response
            .json()
            .await
            .map_err(|e| TodoistError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl TodoistClient for TodoistHttpClient {
    #[instrument(skip(self))]
    async fn active_tasks(&self) -> Result<Vec<TodoistTask>, TodoistError> {
        let token = self
            .config
            .api_key
            .as_ref()
            .filter(|_| self.config.has_api_key())
            .ok_or(TodoistError::NotConfigured)?;

        let mut tasks = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..self.config.max_pages.max(1) {
            let (batch, next) = self.fetch_page(token, cursor.as_deref()).await?.into_parts();
            tasks.extend(batch);

            match next {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => {
                    debug!(count = tasks.len(), pages = page + 1, "Fetched Todoist tasks");
                    return Ok(tasks);
                },
            }
        }

        warn!(
            count = tasks.len(),
            max_pages = self.config.max_pages,
            "Stopped following Todoist cursor at page limit"
        );
        Ok(tasks)
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }
}
