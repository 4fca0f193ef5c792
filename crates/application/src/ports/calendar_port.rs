//! Calendar port - upcoming events

use async_trait::async_trait;
use domain::CalendarEventRecord;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading the user's upcoming calendar events
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalendarPort: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Events from now through the lookahead window, ordered by start
    async fn fetch_upcoming(&self) -> Result<Vec<CalendarEventRecord>, ApplicationError>;
}
