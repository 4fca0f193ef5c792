//! Traffic adapter - Implements TrafficPort using integration_traffic
//!
//! The commute report computes every configured route from the resolved
//! location; single-route lookups serve trips pulled out of calendar entries.

use std::sync::Arc;

use application::{ApplicationError, TrafficPort};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use domain::{Location, TrafficLevel, TrafficReport, TrafficRouteRecord, Trip};
use futures::future::join_all;
use integration_traffic::{ComputedRoutes, GoogleRoutesClient, TrafficClient, TrafficConfig, TrafficError};
use tracing::{debug, instrument, warn};

use crate::config::CommuteRoute;

/// Adapter for driving routes from the Google Routes API
pub struct TrafficAdapter {
    client: Arc<dyn TrafficClient>,
    commute_routes: Vec<CommuteRoute>,
}

impl std::fmt::Debug for TrafficAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficAdapter")
            .field("client", &"GoogleRoutesClient")
            .field("configured", &self.client.is_configured())
            .field("commute_routes", &self.commute_routes.len())
            .finish()
    }
}

impl TrafficAdapter {
    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn with_config(
        config: &TrafficConfig,
        commute_routes: Vec<CommuteRoute>,
    ) -> Result<Self, ApplicationError> {
        let client =
            GoogleRoutesClient::new(config).map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::from_client(Arc::new(client), commute_routes))
    }

    #[must_use]
    pub fn from_client(client: Arc<dyn TrafficClient>, commute_routes: Vec<CommuteRoute>) -> Self {
        Self {
            client,
            commute_routes,
        }
    }

    /// Map integration traffic error to application error
    fn map_error(err: TrafficError) -> ApplicationError {
        match err {
            TrafficError::NotConfigured => {
                ApplicationError::NotConfigured("traffic API key missing".into())
            },
            TrafficError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            TrafficError::Timeout { timeout_secs } => {
                ApplicationError::Timeout(format!("routes request after {timeout_secs}s"))
            },
            TrafficError::InvalidLocation(e) => ApplicationError::ExternalService(format!("invalid location: {e}")),
            other @ (TrafficError::ConnectionFailed(_)
            | TrafficError::RequestFailed(_)
            | TrafficError::ParseError(_)
            | TrafficError::NoRoutesFound { .. }
            | TrafficError::ServiceUnavailable(_)) => ApplicationError::ExternalService(other.to_string()),
        }
    }

    /// Build the route record from the computed alternatives
    fn route_record(name: String, origin: &str, destination: &str, routes: &ComputedRoutes) -> TrafficRouteRecord {
        let primary = &routes.primary;
        #[allow(clippy::cast_precision_loss)]
        let minutes = primary.minutes() as f64;

        TrafficRouteRecord {
            name,
            distance: primary.distance_text(),
            duration: primary.duration_text(),
            duration_seconds: primary.duration_seconds,
            traffic_level: TrafficLevel::from_trip(primary.miles(), minutes),
            alternative_route: routes.alternative_note(),
            origin: origin.to_string(),
            destination: destination.to_string(),
        }
    }

    async fn lookup(&self, name: String, origin: &str, destination: &str) -> Result<TrafficRouteRecord, ApplicationError> {
        let routes = self
            .client
            .compute_routes(origin, destination)
            .await
            .map_err(Self::map_error)?;
        Ok(Self::route_record(name, origin, destination, &routes))
    }
}

#[async_trait]
impl TrafficPort for TrafficAdapter {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[instrument(skip(self), fields(location = %location.as_str(), routes = self.commute_routes.len()))]
    async fn fetch_commute(&self, location: &Location) -> Result<TrafficReport, ApplicationError> {
        if !self.client.is_configured() {
            return Err(Self::map_error(TrafficError::NotConfigured));
        }
        if self.commute_routes.is_empty() {
            warn!("No commute routes configured");
        }

        let lookups = self.commute_routes.iter().map(|route| {
            let origin = route.origin_or(location.as_str());
            let name = route.display_name().to_string();
            async move {
                let result = self.lookup(name.clone(), origin, &route.destination).await;
                (name, result)
            }
        });

        let mut routes = Vec::with_capacity(self.commute_routes.len());
        for (name, result) in join_all(lookups).await {
            match result {
                Ok(record) => routes.push(record),
                Err(e) => warn!(route = %name, error = %e, "Skipping commute route"),
            }
        }

        if routes.is_empty() && !self.commute_routes.is_empty() {
            warn!("Failed to fetch any commute routes");
        }

        let summary = TrafficReport::summarize(&routes);
        debug!(fetched = routes.len(), summary = %summary, "Computed commute report");

        Ok(TrafficReport {
            location: location.as_str().to_string(),
            routes,
            summary,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    #[instrument(skip(self), fields(origin = %trip.origin(), destination = %trip.destination()))]
    async fn fetch_route(&self, trip: &Trip) -> Result<TrafficRouteRecord, ApplicationError> {
        self.lookup(trip.route_name(), trip.origin(), trip.destination())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integration_traffic::RouteEstimate;
    use mockall::mock;

    mock! {
        Routes {}

        #[async_trait]
        impl TrafficClient for Routes {
            async fn compute_routes(&self, origin: &str, destination: &str) -> Result<ComputedRoutes, TrafficError>;
            fn is_configured(&self) -> bool;
        }
    }

    /// 30 miles in the given number of minutes
    fn routes(minutes: u64, alternative_minutes: Option<u64>) -> ComputedRoutes {
        let estimate = |m: u64| RouteEstimate {
            distance_meters: 48_280,
            duration_seconds: m * 60,
        };
        ComputedRoutes {
            primary: estimate(minutes),
            alternatives: alternative_minutes.into_iter().map(estimate).collect(),
        }
    }

    fn commute(name: Option<&str>, origin: Option<&str>, destination: &str) -> CommuteRoute {
        CommuteRoute {
            name: name.map(String::from),
            origin: origin.map(String::from),
            destination: destination.to_string(),
        }
    }

    #[test]
    fn route_record_light_traffic() {
        let record = TrafficAdapter::route_record("Work".into(), "Seattle", "Tacoma", &routes(30, None));

        assert_eq!(record.name, "Work");
        assert_eq!(record.distance, "30.0 miles");
        assert_eq!(record.duration, "30 minutes");
        assert_eq!(record.duration_seconds, 1800);
        assert_eq!(record.traffic_level, TrafficLevel::Light);
        assert!(record.alternative_route.is_none());
    }

    #[test]
    fn route_record_heavy_with_alternative() {
        let record = TrafficAdapter::route_record("Work".into(), "Seattle", "Tacoma", &routes(90, Some(75)));

        assert_eq!(record.traffic_level, TrafficLevel::Heavy);
        assert_eq!(
            record.alternative_route.as_deref(),
            Some("Alternative route available, saves 15 minutes")
        );
    }

    #[test]
    fn map_error_rate_limited() {
        let err = TrafficAdapter::map_error(TrafficError::RateLimitExceeded {
            retry_after_secs: Some(30),
        });
        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[test]
    fn map_error_timeout() {
        let err = TrafficAdapter::map_error(TrafficError::Timeout { timeout_secs: 10 });
        assert!(matches!(err, ApplicationError::Timeout(_)));
    }

    #[test]
    fn map_error_no_routes() {
        let err = TrafficAdapter::map_error(TrafficError::NoRoutesFound {
            from: "A".into(),
            to: "B".into(),
        });
        assert!(matches!(err, ApplicationError::ExternalService(ref m) if m.contains("No routes")));
    }

    #[tokio::test]
    async fn fetch_route_names_trip() {
        let mut client = MockRoutes::new();
        client
            .expect_compute_routes()
            .withf(|o, d| o == "Seattle" && d == "Tacoma")
            .times(1)
            .returning(|_, _| Ok(routes(40, None)));

        let adapter = TrafficAdapter::from_client(Arc::new(client), Vec::new());
        let trip = Trip::new("Seattle", "Tacoma").unwrap();
        let record = adapter.fetch_route(&trip).await.unwrap();

        assert_eq!(record.name, "Trip: Seattle to Tacoma");
        assert_eq!(record.origin, "Seattle");
        assert_eq!(record.destination, "Tacoma");
    }

    #[tokio::test]
    async fn fetch_commute_uses_location_as_default_origin() {
        let mut client = MockRoutes::new();
        client.expect_is_configured().return_const(true);
        client
            .expect_compute_routes()
            .withf(|o, d| o == "Seattle,US" && d == "Bellevue")
            .times(1)
            .returning(|_, _| Ok(routes(30, None)));
        client
            .expect_compute_routes()
            .withf(|o, d| o == "Capitol Hill" && d == "Redmond")
            .times(1)
            .returning(|_, _| Ok(routes(90, None)));

        let adapter = TrafficAdapter::from_client(
            Arc::new(client),
            vec![
                commute(None, None, "Bellevue"),
                commute(Some("Gym"), Some("Capitol Hill"), "Redmond"),
            ],
        );
        let report = adapter
            .fetch_commute(&Location::new("Seattle,US").unwrap())
            .await
            .unwrap();

        assert_eq!(report.location, "Seattle,US");
        assert_eq!(report.routes.len(), 2);
        assert_eq!(report.routes[0].name, "Unnamed Route");
        assert_eq!(report.routes[1].name, "Gym");
        assert_eq!(
            report.summary,
            "Heavy traffic on: Gym. Consider leaving early or using alternatives."
        );
        assert!(report.timestamp.ends_with('Z'));
    }

    #[tokio::test]
    async fn fetch_commute_skips_failing_route() {
        let mut client = MockRoutes::new();
        client.expect_is_configured().return_const(true);
        client
            .expect_compute_routes()
            .withf(|_, d| d == "Nowhere")
            .returning(|o, d| {
                Err(TrafficError::NoRoutesFound {
                    from: o.to_string(),
                    to: d.to_string(),
                })
            });
        client
            .expect_compute_routes()
            .withf(|_, d| d == "Bellevue")
            .returning(|_, _| Ok(routes(30, None)));

        let adapter = TrafficAdapter::from_client(
            Arc::new(client),
            vec![
                commute(Some("Broken"), None, "Nowhere"),
                commute(Some("Work"), None, "Bellevue"),
            ],
        );
        let report = adapter
            .fetch_commute(&Location::new("Seattle").unwrap())
            .await
            .unwrap();

        assert_eq!(report.routes.len(), 1);
        assert_eq!(report.routes[0].name, "Work");
    }

    #[tokio::test]
    async fn fetch_commute_without_routes_reports_no_data() {
        let mut client = MockRoutes::new();
        client.expect_is_configured().return_const(true);

        let adapter = TrafficAdapter::from_client(Arc::new(client), Vec::new());
        let report = adapter
            .fetch_commute(&Location::new("Seattle").unwrap())
            .await
            .unwrap();

        assert!(report.routes.is_empty());
        assert_eq!(report.summary, "No traffic data available");
    }

    #[tokio::test]
    async fn fetch_commute_requires_key() {
        let mut client = MockRoutes::new();
        client.expect_is_configured().return_const(false);

        let adapter = TrafficAdapter::from_client(Arc::new(client), vec![commute(None, None, "Bellevue")]);
        let result = adapter.fetch_commute(&Location::new("Seattle").unwrap()).await;
        assert!(matches!(result, Err(ApplicationError::NotConfigured(_))));
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TrafficAdapter>();
    }
}
