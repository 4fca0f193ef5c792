//! Weather adapter - Implements WeatherPort using integration_weather

use std::sync::Arc;

use application::{ApplicationError, WeatherPort};
use async_trait::async_trait;
use domain::{Location, WeatherRecord};
use integration_weather::{CurrentConditions, OpenWeatherMapClient, WeatherClient, WeatherConfig, WeatherError};
use tracing::{debug, instrument};

/// Adapter for current conditions from OpenWeatherMap
pub struct WeatherAdapter {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("client", &"OpenWeatherMapClient")
            .field("configured", &self.client.is_configured())
            .finish()
    }
}

impl WeatherAdapter {
    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client = OpenWeatherMapClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::from_client(Arc::new(client)))
    }

    /// Wrap an existing client
    #[must_use]
    pub fn from_client(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::NotConfigured => {
                ApplicationError::NotConfigured("weather API key missing".into())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::LocationNotFound(query) => {
                ApplicationError::ExternalService(format!("weather location not found: {query}"))
            },
            other @ (WeatherError::ConnectionFailed(_)
            | WeatherError::RequestFailed(_)
            | WeatherError::ParseError(_)
            | WeatherError::Unauthorized
            | WeatherError::ServiceUnavailable(_)) => ApplicationError::ExternalService(other.to_string()),
        }
    }

    fn map_conditions(conditions: CurrentConditions, queried: &Location) -> WeatherRecord {
        WeatherRecord {
            location: conditions
                .location_name
                .or_else(|| Some(queried.as_str().to_string())),
            temperature: conditions.temperature,
            feels_like: conditions.feels_like,
            condition: conditions.condition,
            description: conditions.description,
            humidity: conditions.humidity,
            wind_speed: conditions.wind_speed,
            precipitation: conditions.rain_last_hour,
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[instrument(skip(self), fields(location = %location.as_str()))]
    async fn fetch_weather(&self, location: &Location) -> Result<WeatherRecord, ApplicationError> {
        let conditions = self
            .client
            .current_by_name(location.as_str())
            .await
            .map_err(Self::map_error)?;

        let record = Self::map_conditions(conditions, location);
        debug!(temperature = ?record.temperature, condition = ?record.condition, "Fetched weather");
        Ok(record)
    }
}
