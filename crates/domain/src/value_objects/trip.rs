//! Driving trip between two or more waypoints

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// An ordered list of waypoints, serialized as a plain JSON array
///
/// Only the first and last waypoints matter for route lookups; intermediate
/// stops are kept so the trip echoes back exactly as it was extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Trip {
    waypoints: Vec<String>,
}

impl Trip {
    /// Build a trip from waypoints
    ///
    /// Blank waypoints are dropped; at least two must remain.
    pub fn from_waypoints<I, S>(waypoints: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let waypoints: Vec<String> = waypoints
            .into_iter()
            .map(|w| w.into().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if waypoints.len() < 2 {
            return Err(DomainError::InvalidTrip(format!(
                "a trip needs an origin and a destination, got {} waypoint(s)",
                waypoints.len()
            )));
        }

        Ok(Self { waypoints })
    }

    /// Convenience constructor for a two-stop trip
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Result<Self, DomainError> {
        Self::from_waypoints([origin.into(), destination.into()])
    }

    /// First waypoint
    #[must_use]
    pub fn origin(&self) -> &str {
        // from_waypoints guarantees two or more entries
        self.waypoints.first().map_or("", String::as_str)
    }

    /// Last waypoint
    #[must_use]
    pub fn destination(&self) -> &str {
        self.waypoints.last().map_or("", String::as_str)
    }

    /// All waypoints in order
    #[must_use]
    pub fn waypoints(&self) -> &[String] {
        &self.waypoints
    }

    /// Display name used for the route record
    #[must_use]
    pub fn route_name(&self) -> String {
        format!("Trip: {} to {}", self.origin(), self.destination())
    }
}

impl TryFrom<Vec<String>> for Trip {
    type Error = DomainError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_waypoints(value)
    }
}

impl From<Trip> for Vec<String> {
    fn from(trip: Trip) -> Self {
        trip.waypoints
    }
}
