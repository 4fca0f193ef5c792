//! Traffic service port
//!
//! Two entry points: the commute report over configured routes, and a single
//! route lookup used to enrich trips the model extracted.

use async_trait::async_trait;
use domain::{Location, TrafficReport, TrafficRouteRecord, Trip};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for driving-time estimates
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TrafficPort: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Report over all configured commute routes
    ///
    /// `location` is the origin for routes that do not name their own.
    async fn fetch_commute(&self, location: &Location) -> Result<TrafficReport, ApplicationError>;

    /// Estimate for a single trip, from its first to its last waypoint
    async fn fetch_route(&self, trip: &Trip) -> Result<TrafficRouteRecord, ApplicationError>;
}
