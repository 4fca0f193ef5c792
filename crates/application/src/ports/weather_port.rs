//! Weather service port
//!
//! Used both by the plain weather fetch and by enrichment of locations the
//! model extracted from the user's data.

use async_trait::async_trait;
use domain::{Location, WeatherRecord};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for current weather lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Current conditions for a place name
    async fn fetch_weather(&self, location: &Location) -> Result<WeatherRecord, ApplicationError>;
}
