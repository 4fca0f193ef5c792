//! Gmail and Calendar models

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Unread message with selected headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    pub snippet: String,
    pub from: Option<String>,
    pub subject: Option<String>,
    /// Raw RFC 2822 `Date` header
    pub date: Option<String>,
}

/// Calendar event with start and end as sent by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// RFC 3339 datetime, or `YYYY-MM-DD` for all-day events
    pub start: Option<String>,
    pub end: Option<String>,
}

impl CalendarEvent {
    /// Whether the event starts on `day`
    ///
    /// Timed starts are compared by the calendar date written in the
    /// timestamp, not converted to another zone. Unparseable starts never match.
    #[must_use]
    pub fn starts_on(&self, day: NaiveDate) -> bool {
        let Some(start) = self.start.as_deref() else {
            return false;
        };

        let start_day = if start.contains('T') {
            DateTime::parse_from_rfc3339(start).ok().map(|dt| dt.date_naive())
        } else {
            NaiveDate::parse_from_str(start, "%Y-%m-%d").ok()
        };
        start_day == Some(day)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
pub(crate) struct RawMessageList {
    #[serde(default)]
    pub messages: Vec<RawMessageRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMessageRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub payload: Option<RawPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPayload {
    #[serde(default)]
    pub headers: Vec<RawHeader>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHeader {
    pub name: String,
    pub value: String,
}

impl From<RawMessage> for MessageSummary {
    fn from(raw: RawMessage) -> Self {
        let headers = raw.payload.map(|p| p.headers).unwrap_or_default();
        let header = |name: &str| {
            headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.clone())
        };

        Self {
            from: header("From"),
            subject: header("Subject"),
            date: header("Date"),
            id: raw.id,
            snippet: raw.snippet,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEventList {
    #[serde(default)]
    pub items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<RawEventTime>,
    #[serde(default)]
    pub end: Option<RawEventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEventTime {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawEventTime {
    fn into_value(self) -> Option<String> {
        self.date_time.or(self.date)
    }
}

impl From<RawEvent> for CalendarEvent {
    fn from(raw: RawEvent) -> Self {
        Self {
            id: raw.id,
            summary: raw.summary,
            description: raw.description,
            location: raw.location,
            start: raw.start.and_then(RawEventTime::into_value),
            end: raw.end.and_then(RawEventTime::into_value),
        }
    }
}
