//! Calendar adapter - Implements CalendarPort using Google Calendar

use std::sync::Arc;

use application::{ApplicationError, CalendarPort};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use domain::CalendarEventRecord;
use integration_google::{CalendarClient, CalendarEvent, GoogleCalendarClient, GoogleConfig};
use tracing::{debug, instrument};

use super::gmail_email_adapter::map_google_error;

/// Adapter for the upcoming week of the primary calendar
pub struct GoogleCalendarAdapter {
    client: Arc<dyn CalendarClient>,
}

impl std::fmt::Debug for GoogleCalendarAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarAdapter")
            .field("configured", &self.client.is_configured())
            .finish()
    }
}

impl GoogleCalendarAdapter {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: &GoogleConfig) -> Result<Self, ApplicationError> {
        let client =
            GoogleCalendarClient::new(config).map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::from_client(Arc::new(client)))
    }

    #[must_use]
    pub fn from_client(client: Arc<dyn CalendarClient>) -> Self {
        Self { client }
    }

    fn map_event(event: CalendarEvent, today: NaiveDate) -> CalendarEventRecord {
        let is_today = event.starts_on(today);
        CalendarEventRecord {
            id: event.id,
            summary: event.summary,
            description: event.description,
            location: event.location,
            start: event.start,
            end: event.end,
            is_today,
        }
    }
}

#[async_trait]
impl CalendarPort for GoogleCalendarAdapter {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[instrument(skip(self))]
    async fn fetch_upcoming(&self) -> Result<Vec<CalendarEventRecord>, ApplicationError> {
        let now = Utc::now();
        let events = self
            .client
            .upcoming_events(now)
            .await
            .map_err(map_google_error)?;

        let today = now.date_naive();
        let records: Vec<_> = events
            .into_iter()
            .map(|event| Self::map_event(event, today))
            .collect();

        debug!(
            count = records.len(),
            today = records.iter().filter(|r| r.is_today).count(),
            "Fetched calendar events"
        );
        Ok(records)
    }
}
