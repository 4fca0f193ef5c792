//! Data source identifiers
//!
//! Each variant names one external provider and doubles as the key under
//! which its payload appears in the digest bag.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// One of the data sources that can contribute to a digest
///
/// Declaration order is the order keys appear in a serialized bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Unread Gmail messages
    Emails,
    /// NewsAPI top headlines
    News,
    /// Google Calendar events for the coming week
    Calendar,
    /// OpenWeatherMap current conditions
    Weather,
    /// Google Routes commute estimates
    Traffic,
    /// Todoist active tasks
    Todos,
}

impl SourceKind {
    /// All sources in bag order
    pub const ALL: [Self; 6] = [
        Self::Emails,
        Self::News,
        Self::Calendar,
        Self::Weather,
        Self::Traffic,
        Self::Todos,
    ];

    /// Key used in the digest bag and in warnings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emails => "emails",
            Self::News => "news",
            Self::Calendar => "calendar",
            Self::Weather => "weather",
            Self::Traffic => "traffic",
            Self::Todos => "todos",
        }
    }

    /// Name reported by the health endpoint
    ///
    /// Differs from the bag key only for email, which health reports in the
    /// singular.
    #[must_use]
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Emails => "email",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emails" | "email" => Ok(Self::Emails),
            "news" => Ok(Self::News),
            "calendar" => Ok(Self::Calendar),
            "weather" => Ok(Self::Weather),
            "traffic" => Ok(Self::Traffic),
            "todos" | "todo" => Ok(Self::Todos),
            other => Err(DomainError::UnknownSource(other.to_string())),
        }
    }
}
