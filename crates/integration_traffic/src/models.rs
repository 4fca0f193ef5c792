//! Route estimate models

use serde::{Deserialize, Serialize};

const MILES_PER_METER: f64 = 0.000_621_371;

/// Driving estimate for one route alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_meters: u64,
    /// Traffic-aware travel time
    pub duration_seconds: u64,
}

impl RouteEstimate {
    /// Whole minutes, truncated
    #[must_use]
    pub const fn minutes(&self) -> u64 {
        self.duration_seconds / 60
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn miles(&self) -> f64 {
        self.distance_meters as f64 * MILES_PER_METER
    }

    /// e.g. `32.4 miles`
    #[must_use]
    pub fn distance_text(&self) -> String {
        format!("{:.1} miles", self.miles())
    }

    /// e.g. `41 minutes`
    #[must_use]
    pub fn duration_text(&self) -> String {
        format!("{} minutes", self.minutes())
    }
}

/// All alternatives returned for one origin/destination pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedRoutes {
    /// The route the API ranks first
    pub primary: RouteEstimate,
    pub alternatives: Vec<RouteEstimate>,
}

impl ComputedRoutes {
    /// Minutes saved by the first alternative, if it is faster
    #[must_use]
    pub fn alternative_savings_minutes(&self) -> Option<u64> {
        let alternative = self.alternatives.first()?;
        let primary = self.primary.minutes();
        (alternative.minutes() < primary).then(|| primary - alternative.minutes())
    }

    /// Human-readable note about a faster alternative
    #[must_use]
    pub fn alternative_note(&self) -> Option<String> {
        self.alternative_savings_minutes()
            .map(|saved| format!("Alternative route available, saves {saved} minutes"))
    }
}

/// Parse a protobuf `Duration` string such as `"1834s"`
pub(crate) fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let trimmed = raw.trim().trim_end_matches('s');
    if trimmed.is_empty() {
        return Some(0);
    }
    // Sub-second precision is not meaningful for drive times
    trimmed.split('.').next()?.parse().ok()
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoutesResponse {
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRoute {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub distance_meters: Option<u64>,
}

impl RawRoute {
    pub(crate) fn estimate(&self) -> Option<RouteEstimate> {
        let duration_seconds = match self.duration.as_deref() {
            Some(raw) => parse_duration_seconds(raw)?,
            None => 0,
        };
        Some(RouteEstimate {
            distance_meters: self.distance_meters.unwrap_or(0),
            duration_seconds,
        })
    }
}
