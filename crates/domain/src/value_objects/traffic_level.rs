//! Congestion classification derived from average route speed

use std::fmt;

use serde::{Deserialize, Serialize};

/// Average speed above which traffic counts as light (mph)
const LIGHT_ABOVE_MPH: f64 = 45.0;

/// Average speed above which traffic counts as moderate (mph)
const MODERATE_ABOVE_MPH: f64 = 30.0;

/// How congested a route currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Light,
    Moderate,
    Heavy,
    Unknown,
}

impl TrafficLevel {
    /// Classify a route by its average speed
    ///
    /// A zero (or negative) duration cannot yield a speed and is `Unknown`.
    #[must_use]
    pub fn from_trip(distance_miles: f64, duration_minutes: f64) -> Self {
        if duration_minutes <= 0.0 {
            return Self::Unknown;
        }
        let avg_mph = distance_miles / (duration_minutes / 60.0);
        Self::from_average_speed(avg_mph)
    }

    /// Classify an average speed in miles per hour
    #[must_use]
    pub fn from_average_speed(mph: f64) -> Self {
        if mph > LIGHT_ABOVE_MPH {
            Self::Light
        } else if mph > MODERATE_ABOVE_MPH {
            Self::Moderate
        } else {
            Self::Heavy
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_route_is_light() {
        // 60 miles in 60 minutes
        assert_eq!(TrafficLevel::from_trip(60.0, 60.0), TrafficLevel::Light);
    }

    #[test]
    fn medium_route_is_moderate() {
        // 40 mph
        assert_eq!(TrafficLevel::from_trip(20.0, 30.0), TrafficLevel::Moderate);
    }

    #[test]
    fn slow_route_is_heavy() {
        assert_eq!(TrafficLevel::from_trip(10.0, 30.0), TrafficLevel::Heavy);
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(TrafficLevel::from_average_speed(45.0), TrafficLevel::Moderate);
        assert_eq!(TrafficLevel::from_average_speed(30.0), TrafficLevel::Heavy);
    }

    #[test]
    fn zero_duration_is_unknown() {
        assert_eq!(TrafficLevel::from_trip(12.0, 0.0), TrafficLevel::Unknown);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TrafficLevel::Moderate).unwrap(),
            "\"moderate\""
        );
    }
}
