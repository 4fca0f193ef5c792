//! Per-source record shapes
//!
//! Each source contributes its own shape; there is deliberately no shared
//! schema. Field names match the JSON the digest endpoint returns.

use serde::{Deserialize, Serialize};

use crate::value_objects::{TrafficLevel, Trip};

/// An unread inbox message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    pub snippet: String,
    pub from: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
}

/// A calendar event within the lookahead window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventRecord {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// RFC 3339 timestamp, or a bare date for all-day events
    pub start: Option<String>,
    pub end: Option<String>,
    /// Whether the event starts on the current UTC date
    pub is_today: bool,
}

/// A top-headline article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticleRecord {
    pub title: Option<String>,
    /// Publisher name
    pub source: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

/// Current conditions for one place, imperial units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Place name as resolved by the provider
    pub location: Option<String>,
    /// Fahrenheit
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    /// Short condition group such as `Rain`
    pub condition: Option<String>,
    pub description: Option<String>,
    /// Percent
    pub humidity: Option<u8>,
    /// Miles per hour
    pub wind_speed: Option<f64>,
    /// Rain volume over the last hour in millimetres, zero when absent
    pub precipitation: f64,
}

/// Driving estimate for a single origin/destination pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRouteRecord {
    pub name: String,
    /// Human readable, e.g. `32.4 miles`
    pub distance: String,
    /// Human readable, e.g. `41 minutes`
    pub duration: String,
    pub duration_seconds: u64,
    pub traffic_level: TrafficLevel,
    pub alternative_route: Option<String>,
    pub origin: String,
    pub destination: String,
}

/// Commute report produced by the plain traffic fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    /// Default origin used for routes without an explicit one
    pub location: String,
    pub routes: Vec<TrafficRouteRecord>,
    pub summary: String,
    pub timestamp: String,
}

impl TrafficReport {
    /// One-line description of the worst congestion across routes
    #[must_use]
    pub fn summarize(routes: &[TrafficRouteRecord]) -> String {
        if routes.is_empty() {
            return "No traffic data available".to_string();
        }

        let names_at = |level: TrafficLevel| {
            routes
                .iter()
                .filter(|r| r.traffic_level == level)
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
        };

        let heavy = names_at(TrafficLevel::Heavy);
        if !heavy.is_empty() {
            return format!(
                "Heavy traffic on: {}. Consider leaving early or using alternatives.",
                heavy.join(", ")
            );
        }

        let moderate = names_at(TrafficLevel::Moderate);
        if !moderate.is_empty() {
            return format!(
                "Moderate traffic on: {}. Normal commute time expected.",
                moderate.join(", ")
            );
        }

        "Light traffic on all routes. Good time to travel!".to_string()
    }
}

/// Todoist task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: String,
    pub content: String,
    pub description: String,
    /// 1 (normal) to 4 (urgent)
    pub priority: u8,
    pub project_id: Option<String>,
    pub labels: Vec<String>,
    /// Human due string such as `tomorrow at 5pm`
    pub due: Option<String>,
    pub is_overdue: bool,
}

/// Weather fetched for a location the model found in the user's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLookup {
    pub location: String,
    pub weather: WeatherRecord,
}

/// Route fetched for a trip the model found in the user's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripTraffic {
    pub trip: Trip,
    pub traffic: TrafficRouteRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, level: TrafficLevel) -> TrafficRouteRecord {
        TrafficRouteRecord {
            name: name.to_string(),
            distance: "10.0 miles".to_string(),
            duration: "20 minutes".to_string(),
            duration_seconds: 1200,
            traffic_level: level,
            alternative_route: None,
            origin: "A".to_string(),
            destination: "B".to_string(),
        }
    }

    #[test]
    fn summary_without_routes() {
        assert_eq!(TrafficReport::summarize(&[]), "No traffic data available");
    }

    #[test]
    fn summary_prefers_heavy() {
        let routes = vec![
            route("Work", TrafficLevel::Moderate),
            route("Gym", TrafficLevel::Heavy),
            route("School", TrafficLevel::Heavy),
        ];
        assert_eq!(
            TrafficReport::summarize(&routes),
            "Heavy traffic on: Gym, School. Consider leaving early or using alternatives."
        );
    }

    #[test]
    fn summary_moderate() {
        let routes = vec![
            route("Work", TrafficLevel::Moderate),
            route("Gym", TrafficLevel::Light),
        ];
        assert_eq!(
            TrafficReport::summarize(&routes),
            "Moderate traffic on: Work. Normal commute time expected."
        );
    }

    #[test]
    fn summary_light() {
        let routes = vec![route("Work", TrafficLevel::Light), route("Gym", TrafficLevel::Unknown)];
        assert_eq!(
            TrafficReport::summarize(&routes),
            "Light traffic on all routes. Good time to travel!"
        );
    }

    #[test]
    fn news_uses_camel_case_published_at() {
        let article = NewsArticleRecord {
            title: Some("X".to_string()),
            source: Some("Y".to_string()),
            description: Some("Z".to_string()),
            url: Some("u".to_string()),
            published_at: Some("t".to_string()),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "X", "source": "Y", "description": "Z", "url": "u", "publishedAt": "t"
            })
        );
    }

    #[test]
    fn email_serializes_from_field() {
        let email = EmailRecord {
            id: "m1".to_string(),
            snippet: "hi".to_string(),
            from: Some("alice@example.com".to_string()),
            subject: None,
            date: None,
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["from"], "alice@example.com");
        assert!(json["subject"].is_null());
    }
}
