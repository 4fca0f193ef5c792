//! Gmail API client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::GoogleConfig;
use crate::error::GoogleError;
use crate::models::{MessageSummary, RawMessage, RawMessageList};
use crate::oauth::{AccessTokenSource, OAuthClient};

/// Inbox access
#[async_trait]
pub trait GmailClient: Send + Sync {
    /// Unread messages in the inbox, newest first, with From/Subject/Date
    async fn unread_inbox(&self, max_results: u32) -> Result<Vec<MessageSummary>, GoogleError>;

    fn is_configured(&self) -> bool;
}

/// Gmail REST client
#[derive(Debug)]
pub struct GmailApiClient {
    client: Client,
    tokens: AccessTokenSource,
    base_url: String,
    configured: bool,
}

impl GmailApiClient {
    /// Create a Gmail client from the shared Google configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GoogleConfig) -> Result<Self, GoogleError> {
        let oauth = Arc::new(OAuthClient::new(config)?);
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GoogleError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            tokens: AccessTokenSource::new(oauth, config.gmail_refresh_token.clone()),
            base_url: config.gmail_base_url.trim_end_matches('/').to_string(),
            configured: config.gmail_configured(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GoogleError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|e| GoogleError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.tokens.invalidate();
            }
            let detail = response.text().await.unwrap_or_default();
            return Err(GoogleError::from_status(status, &detail));
        }

        response
            .json()
            .await
            .map_err(|e| GoogleError::ParseError(e.to_string()))
    }

    async fn message_metadata(&self, id: &str) -> Result<MessageSummary, GoogleError> {
        let url = format!("{}/users/me/messages/{id}", self.base_url);
        let raw: RawMessage = self
            .get_json(
                &url,
                &[
                    ("format", "metadata"),
                    ("metadataHeaders", "From"),
                    ("metadataHeaders", "Subject"),
                    ("metadataHeaders", "Date"),
                ],
            )
            .await?;
        Ok(raw.into())
    }
}

#[async_trait]
impl GmailClient for GmailApiClient {
    #[instrument(skip(self))]
    async fn unread_inbox(&self, max_results: u32) -> Result<Vec<MessageSummary>, GoogleError> {
        let url = format!("{}/users/me/messages", self.base_url);
        let max = max_results.to_string();
        let list: RawMessageList = self
            .get_json(
                &url,
                &[
                    ("labelIds", "INBOX"),
                    ("labelIds", "UNREAD"),
                    ("maxResults", max.as_str()),
                ],
            )
            .await?;

        if list.messages.is_empty() {
            debug!("No unread messages");
            return Ok(Vec::new());
        }

        let details = join_all(
            list.messages
                .iter()
                .map(|message| self.message_metadata(&message.id)),
        )
        .await;

        // A message that fails to load is dropped; the rest of the inbox still counts
        let summaries: Vec<MessageSummary> = list
            .messages
            .iter()
            .zip(details)
            .filter_map(|(message, detail)| match detail {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!(id = %message.id, error = %e, "Skipping unreadable message");
                    None
                },
            })
            .collect();

        debug!(count = summaries.len(), "Fetched unread messages");
        Ok(summaries)
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
