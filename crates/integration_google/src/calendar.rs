//! Google Calendar API client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::GoogleConfig;
use crate::error::GoogleError;
use crate::models::{CalendarEvent, RawEventList};
use crate::oauth::{AccessTokenSource, OAuthClient};

/// Calendar access
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Single (expanded) events starting from `from` through the configured window, by start time
    async fn upcoming_events(&self, from: DateTime<Utc>) -> Result<Vec<CalendarEvent>, GoogleError>;

    fn is_configured(&self) -> bool;
}

/// Google Calendar REST client
#[derive(Debug)]
pub struct GoogleCalendarClient {
    client: Client,
    tokens: AccessTokenSource,
    base_url: String,
    calendar_id: String,
    window: chrono::Duration,
    configured: bool,
}

impl GoogleCalendarClient {
    /// Create a Calendar client from the shared Google configuration
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
            tokens: AccessTokenSource::new(oauth, config.calendar_refresh_token.clone()),
            base_url: config.calendar_base_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            window: chrono::Duration::days(i64::from(config.calendar_window_days)),
            configured: config.calendar_configured(),
        })
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    #[instrument(skip(self), fields(calendar = %self.calendar_id))]
    async fn upcoming_events(&self, from: DateTime<Utc>) -> Result<Vec<CalendarEvent>, GoogleError> {
        let token = self.tokens.access_token().await?;

        let url = format!("{}/calendars/{}/events", self.base_url, self.calendar_id);
        let time_min = from.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = (from + self.window).to_rfc3339_opts(SecondsFormat::Secs, true);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
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

        let list: RawEventList = response
            .json()
            .await
            .map_err(|e| GoogleError::ParseError(e.to_string()))?;

        let events: Vec<CalendarEvent> = list.items.into_iter().map(CalendarEvent::from).collect();
        debug!(count = events.len(), "Fetched calendar events");
        Ok(events)
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
