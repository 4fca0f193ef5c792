//! Digest assembly settings.

use std::time::Duration;

use application::{ApplicationError, DigestConfig};
use domain::Location;
use serde::{Deserialize, Serialize};

/// Name given to commute routes configured without one
pub const UNNAMED_ROUTE: &str = "Unnamed Route";

/// A configured commute for the plain traffic report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuteRoute {
    #[serde(default)]
    pub name: Option<String>,
    /// Falls back to the request's location when absent
    #[serde(default)]
    pub origin: Option<String>,
    pub destination: String,
}

impl CommuteRoute {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(UNNAMED_ROUTE)
    }

    /// Origin to use when the request resolved `location`
    #[must_use]
    pub fn origin_or<'a>(&'a self, location: &'a str) -> &'a str {
        self.origin
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(location)
    }
}

/// Digest settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestAppConfig {
    /// Location used for weather and traffic when a request names none
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Unread messages to fetch (default: 20)
    #[serde(default = "default_max_emails")]
    pub max_emails: u32,

    /// Headlines to fetch (default: 10)
    #[serde(default = "default_max_news")]
    pub max_news: u32,

    /// Per-source fetch budget in seconds (default: 10)
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: u64,

    /// Whole-request budget in seconds (default: 120)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub commute_routes: Vec<CommuteRoute>,
}

fn default_location() -> String {
    "Seattle,US".to_string()
}

const fn default_max_emails() -> u32 {
    20
}

const fn default_max_news() -> u32 {
    10
}

const fn default_source_timeout() -> u64 {
    10
}

const fn default_request_timeout() -> u64 {
    120
}

impl Default for DigestAppConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
            max_emails: default_max_emails(),
            max_news: default_max_news(),
            source_timeout_secs: default_source_timeout(),
            request_timeout_secs: default_request_timeout(),
            commute_routes: Vec::new(),
        }
    }
}

impl DigestAppConfig {
    /// Convert to the service-level configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the default location is blank.
    pub fn to_digest_config(&self) -> Result<DigestConfig, ApplicationError> {
        let location = Location::new(&self.default_location)
            .map_err(|e| ApplicationError::Configuration(format!("digest.default_location: {e}")))?;

        Ok(DigestConfig::new(location)
            .with_source_timeout(Duration::from_secs(self.source_timeout_secs.max(1)))
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs.max(1))))
    }
}
