//! OpenWeatherMap weather client
//!
//! HTTP client for the OpenWeatherMap current weather API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, CurrentConditions};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No API key configured
    #[error("Weather API key not configured")]
    NotConfigured,

    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// API key was rejected
    #[error("Unauthorized: check the weather API key")]
    Unauthorized,

    /// The place name did not resolve
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `appid`
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Unit system: `imperial`, `metric` or `standard` (default: imperial)
    #[serde(default = "default_units")]
    pub units: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "imperial".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            units: default_units(),
            timeout_secs: default_timeout(),
        }
    }
}

impl WeatherConfig {
    /// Whether a non-blank API key is present
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }
}

/// Weather client trait for fetching weather data
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current conditions for a place name such as `Seattle,US`
    async fn current_by_name(&self, query: &str) -> Result<CurrentConditions, WeatherError>;

    /// Whether the client has credentials
    fn is_configured(&self) -> bool;
}

/// OpenWeatherMap HTTP client implementation
#[derive(Debug)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherMapClient {
    /// Create a new OpenWeatherMap client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn check_status(status: StatusCode, query: &str) -> Result<(), WeatherError> {
        match status {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(WeatherError::Unauthorized),
            StatusCode::NOT_FOUND => Err(WeatherError::LocationNotFound(query.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(WeatherError::RateLimitExceeded),
            s if s.is_server_error() => Err(WeatherError::ServiceUnavailable(format!("HTTP {s}"))),
            s => Err(WeatherError::RequestFailed(format!("HTTP {s}"))),
        }
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherMapClient {
    #[instrument(skip(self), fields(units = %self.config.units))]
    async fn current_by_name(&self, query: &str) -> Result<CurrentConditions, WeatherError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .filter(|_| self.config.has_api_key())
            .ok_or(WeatherError::NotConfigured)?;

        let url = format!("{}/weather", self.config.base_url.trim_end_matches('/'));
        debug!(url = %url, "Fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("appid", api_key.expose_secret()),
                ("units", self.config.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        Self::check_status(response.status(), query)?;

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        Ok(api_response.into())
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }
}
