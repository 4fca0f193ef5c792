//! Email adapter - Implements EmailPort using the Gmail API

use std::sync::Arc;

use application::{ApplicationError, EmailPort};
use async_trait::async_trait;
use domain::EmailRecord;
use integration_google::{GmailApiClient, GmailClient, GoogleConfig, GoogleError, MessageSummary};
use tracing::{debug, instrument};

/// Adapter for unread inbox messages
pub struct GmailEmailAdapter {
    client: Arc<dyn GmailClient>,
    max_results: u32,
}

impl std::fmt::Debug for GmailEmailAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailEmailAdapter")
            .field("configured", &self.client.is_configured())
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl GmailEmailAdapter {
    /// Create an adapter fetching at most `max_results` unread messages
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: &GoogleConfig, max_results: u32) -> Result<Self, ApplicationError> {
        let client = GmailApiClient::new(config).map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::from_client(Arc::new(client), max_results))
    }

    #[must_use]
    pub fn from_client(client: Arc<dyn GmailClient>, max_results: u32) -> Self {
        Self { client, max_results }
    }

    fn map_message(message: MessageSummary) -> EmailRecord {
        EmailRecord {
            id: message.id,
            snippet: message.snippet,
            from: message.from,
            subject: message.subject,
            date: message.date,
        }
    }
}

/// Map Google API errors; shared with the calendar adapter
pub(crate) fn map_google_error(err: GoogleError) -> ApplicationError {
    match err {
        GoogleError::NotConfigured(what) => ApplicationError::NotConfigured(what),
        GoogleError::RateLimitExceeded => ApplicationError::RateLimited,
        other @ (GoogleError::ConnectionFailed(_)
        | GoogleError::RequestFailed(_)
        | GoogleError::ParseError(_)
        | GoogleError::TokenRejected(_)
        | GoogleError::Unauthorized(_)
        | GoogleError::ServiceUnavailable(_)
        | GoogleError::CredentialsFile(_)) => ApplicationError::ExternalService(other.to_string()),
    }
}

#[async_trait]
impl EmailPort for GmailEmailAdapter {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[instrument(skip(self), fields(max_results = self.max_results))]
    async fn fetch_unread(&self) -> Result<Vec<EmailRecord>, ApplicationError> {
        let messages = self
            .client
            .unread_inbox(self.max_results)
            .await
            .map_err(map_google_error)?;

        debug!(count = messages.len(), "Fetched unread messages");
        Ok(messages.into_iter().map(Self::map_message).collect())
    }
}
