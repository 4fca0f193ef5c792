//! Entities extracted from the user's own data by the language model
//!
//! The model is asked for a bare JSON object of the form
//! `{"locations": [...], "trips": [[origin, destination], ...]}`. Replies are
//! parsed leniently: code fences are stripped, unknown keys and malformed
//! items are ignored, and anything unparseable degrades to no entities.

use serde::Serialize;
use serde_json::Value;

use crate::value_objects::Trip;

/// Places and drives mentioned in calendar, email and todo content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    /// Distinct place names in first-mention order
    pub locations: Vec<String>,
    pub trips: Vec<Trip>,
}

impl ExtractedEntities {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.trips.is_empty()
    }

    fn from_object(map: &serde_json::Map<String, Value>) -> Self {
        let mut locations: Vec<String> = Vec::new();
        for name in map
            .get("locations")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            if !locations.iter().any(|existing| existing == name) {
                locations.push(name.to_string());
            }
        }

        let trips = map
            .get("trips")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_array)
            .filter_map(|stops| {
                Trip::from_waypoints(stops.iter().filter_map(Value::as_str)).ok()
            })
            .collect();

        Self { locations, trips }
    }
}

/// Result of parsing the extraction reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Reply was a JSON object; it may still contain no entities
    Parsed(ExtractedEntities),
    /// Reply could not be used and extraction proceeds empty
    Fallback { reason: String },
}

impl ExtractionOutcome {
    /// Parse a raw model reply
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_code_fence(raw);
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::Object(map)) => Self::Parsed(ExtractedEntities::from_object(&map)),
            Ok(other) => Self::Fallback {
                reason: format!("expected a JSON object, got {}", json_type_name(&other)),
            },
            Err(e) => Self::Fallback {
                reason: format!("reply is not valid JSON: {e}"),
            },
        }
    }

    /// Entities to enrich, empty on fallback
    #[must_use]
    pub fn into_entities(self) -> ExtractedEntities {
        match self {
            Self::Parsed(entities) => entities,
            Self::Fallback { .. } => ExtractedEntities::default(),
        }
    }

    #[must_use]
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::Parsed(_) => None,
            Self::Fallback { reason } => Some(reason),
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Remove a surrounding Markdown code fence and its language tag
///
/// Text that does not start with a fence is only trimmed.
#[must_use]
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines.first().is_some_and(|l| l.starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.starts_with("```")) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}
