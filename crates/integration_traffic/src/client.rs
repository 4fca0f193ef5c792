//! Google Routes client
//!
//! Computes traffic-aware driving routes with the
//! [`directions/v2:computeRoutes`](https://developers.google.com/maps/documentation/routes/reference/rest/v2/TopLevel/computeRoutes)
//! endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::config::TrafficConfig;
use crate::error::TrafficError;
use crate::models::{ComputedRoutes, RawRoutesResponse};

const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline,\
routes.legs.duration,routes.legs.distanceMeters,routes.localizedValues,routes.description";

/// Trait for road traffic clients
#[async_trait]
pub trait TrafficClient: Send + Sync {
    /// Compute driving routes between two free-form addresses
    async fn compute_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<ComputedRoutes, TrafficError>;

    /// Whether an API key is available
    fn is_configured(&self) -> bool;
}

/// Google Routes API client
#[derive(Debug)]
pub struct GoogleRoutesClient {
    client: Client,
    config: TrafficConfig,
}

impl GoogleRoutesClient {
    /// Create a new Routes client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &TrafficConfig) -> Result<Self, TrafficError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TrafficError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn request_body(&self, origin: &str, destination: &str) -> serde_json::Value {
        json!({
            "origin": { "address": origin },
            "destination": { "address": destination },
            "travelMode": "DRIVE",
            "routingPreference": "TRAFFIC_AWARE",
            "computeAlternativeRoutes": self.config.compute_alternatives,
            "routeModifiers": {
                "avoidTolls": self.config.avoid_tolls,
                "avoidHighways": self.config.avoid_highways,
                "avoidFerries": self.config.avoid_ferries
            },
            "languageCode": self.config.language_code,
            "units": "IMPERIAL"
        })
    }

    fn parse_routes_response(
        body: &str,
        origin: &str,
        destination: &str,
    ) -> Result<ComputedRoutes, TrafficError> {
        let raw: RawRoutesResponse =
            serde_json::from_str(body).map_err(|e| TrafficError::ParseError(e.to_string()))?;

        let mut estimates = raw
            .routes
            .iter()
            .map(|route| {
                route.estimate().ok_or_else(|| {
                    TrafficError::ParseError(format!(
                        "unreadable duration {:?}",
                        route.duration.as_deref().unwrap_or_default()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        let primary = estimates.next().ok_or_else(|| TrafficError::NoRoutesFound {
            from: origin.to_string(),
            to: destination.to_string(),
        })?;

        Ok(ComputedRoutes {
            primary,
            alternatives: estimates.collect(),
        })
    }
}

#[async_trait]
impl TrafficClient for GoogleRoutesClient {
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    async fn compute_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<ComputedRoutes, TrafficError> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Err(TrafficError::InvalidLocation(
                "origin and destination must not be empty".to_string(),
            ));
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .filter(|_| self.config.has_api_key())
            .ok_or(TrafficError::NotConfigured)?;

        let url = format!(
            "{}/directions/v2:computeRoutes",
            self.config.base_url.trim_end_matches('/')
        );
        debug!(?url, "Computing routes");

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", api_key.expose_secret())
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&self.request_body(origin, destination))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TrafficError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    TrafficError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TrafficError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if status.is_server_error() {
            return Err(TrafficError::ServiceUnavailable(format!("HTTP {status}")));
        }

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, %detail, "Routes API rejected request");
            return Err(TrafficError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TrafficError::ParseError(e.to_string()))?;

        let routes = Self::parse_routes_response(&body, origin, destination)?;
        debug!(
            minutes = routes.primary.minutes(),
            alternatives = routes.alternatives.len(),
            "Routes computed"
        );
        Ok(routes)
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }
}
