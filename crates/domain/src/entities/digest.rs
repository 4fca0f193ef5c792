//! Digest request and result
//!
//! A request selects which sources to consult; the result carries the model's
//! narrative, the bag it was built from, and any partial failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::digest_bag::DigestBag;
use crate::value_objects::SourceKind;

const fn default_true() -> bool {
    true
}

/// Which sources to include and where the user is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DigestRequest {
    #[serde(default = "default_true")]
    pub include_email: bool,
    #[serde(default = "default_true")]
    pub include_news: bool,
    #[serde(default = "default_true")]
    pub include_calendar: bool,
    #[serde(default = "default_true")]
    pub include_weather: bool,
    #[serde(default = "default_true")]
    pub include_traffic: bool,
    #[serde(default = "default_true")]
    pub include_todos: bool,
    /// Overrides the configured default location for weather and traffic;
    /// blank means the default
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

impl Default for DigestRequest {
    fn default() -> Self {
        Self {
            include_email: true,
            include_news: true,
            include_calendar: true,
            include_weather: true,
            include_traffic: true,
            include_todos: true,
            location: None,
        }
    }
}

impl DigestRequest {
    /// A request with every source disabled except the given ones
    #[must_use]
    pub fn only(sources: &[SourceKind]) -> Self {
        let mut request = Self::default();
        for kind in SourceKind::ALL {
            request.set_included(kind, sources.contains(&kind));
        }
        request
    }

    /// Set the location override
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Whether a source was asked for
    #[must_use]
    pub const fn includes(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Emails => self.include_email,
            SourceKind::News => self.include_news,
            SourceKind::Calendar => self.include_calendar,
            SourceKind::Weather => self.include_weather,
            SourceKind::Traffic => self.include_traffic,
            SourceKind::Todos => self.include_todos,
        }
    }

    pub fn set_included(&mut self, kind: SourceKind, included: bool) {
        let flag = match kind {
            SourceKind::Emails => &mut self.include_email,
            SourceKind::News => &mut self.include_news,
            SourceKind::Calendar => &mut self.include_calendar,
            SourceKind::Weather => &mut self.include_weather,
            SourceKind::Traffic => &mut self.include_traffic,
            SourceKind::Todos => &mut self.include_todos,
        };
        *flag = included;
    }

    /// Enabled sources in bag order
    #[must_use]
    pub fn enabled_sources(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| self.includes(*kind))
            .collect()
    }

    /// Location override with surrounding whitespace removed, if non-blank
    #[must_use]
    pub fn location_override(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Pipeline stage where a partial failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningStage {
    /// A source fetch failed, timed out, or was not configured
    SourceFetch,
    /// The model's entity list could not be parsed
    Extraction,
    /// A weather or route lookup for an extracted entity failed
    Enrichment,
}

/// A non-fatal failure reported alongside the digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestWarning {
    pub stage: WarningStage,
    /// Source key for fetch failures, or the entity for enrichment failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub message: String,
}

impl DigestWarning {
    pub fn source_fetch(kind: SourceKind, message: impl Into<String>) -> Self {
        Self {
            stage: WarningStage::SourceFetch,
            source: Some(kind.as_str().to_string()),
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self {
            stage: WarningStage::Extraction,
            source: None,
            message: message.into(),
        }
    }

    pub fn enrichment(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: WarningStage::Enrichment,
            source: Some(subject.into()),
            message: message.into(),
        }
    }
}

/// Finished digest returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct DigestResult {
    /// Model-written narrative
    pub summary: String,
    /// The bag the summary was written from, after enrichment
    pub details: DigestBag,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DigestWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_true_when_missing() {
        let request: DigestRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, DigestRequest::default());
        assert_eq!(request.enabled_sources().len(), 6);
    }

    #[test]
    fn explicit_false_disables_source() {
        let request: DigestRequest =
            serde_json::from_str(r#"{"include_email": false, "include_todos": false}"#).unwrap();
        assert_eq!(
            request.enabled_sources(),
            vec![
                SourceKind::News,
                SourceKind::Calendar,
                SourceKind::Weather,
                SourceKind::Traffic
            ]
        );
    }

    #[test]
    fn only_enables_listed_sources() {
        let request = DigestRequest::only(&[SourceKind::News]);
        assert!(request.includes(SourceKind::News));
        assert!(!request.includes(SourceKind::Emails));
        assert_eq!(request.enabled_sources(), vec![SourceKind::News]);
    }

    #[test]
    fn location_override_ignores_blank() {
        let request = DigestRequest::default().with_location("   ");
        assert_eq!(request.location_override(), None);

        let request = DigestRequest::default().with_location(" Tacoma ");
        assert_eq!(request.location_override(), Some("Tacoma"));
    }

    #[test]
    fn location_length_is_validated() {
        let request = DigestRequest::default().with_location("x".repeat(201));
        assert!(request.validate().is_err());

        let request = DigestRequest::default().with_location("Seattle,US");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_location_is_valid() {
        let request = DigestRequest::default().with_location("");
        assert!(request.validate().is_ok());
        assert_eq!(request.location_override(), None);
    }

    #[test]
    fn warnings_are_omitted_when_empty() {
        let result = DigestResult {
            summary: "ok".to_string(),
            details: DigestBag::new(),
            timestamp: Utc::now(),
            warnings: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("warnings").is_none());
        assert_eq!(json["details"], serde_json::json!({}));
    }

    #[test]
    fn warning_serialization() {
        let warning = DigestWarning::source_fetch(SourceKind::Todos, "timed out");
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"stage": "source_fetch", "source": "todos", "message": "timed out"})
        );

        let json = serde_json::to_value(DigestWarning::extraction("not json")).unwrap();
        assert!(json.get("source").is_none());
    }
}
