//! OpenWeatherMap API response models

use serde::{Deserialize, Serialize};

/// Current conditions for one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Place name as resolved by the API
    pub location_name: Option<String>,
    /// Temperature in the requested units
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    /// Condition group, e.g. `Rain`
    pub condition: Option<String>,
    /// Condition detail, e.g. `light rain`
    pub description: Option<String>,
    /// Relative humidity percent
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    /// Rain volume for the last hour in mm, zero when not reported
    pub rain_last_hour: f64,
}

/// `/weather` response body
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<MainData>,
    #[serde(default)]
    pub weather: Vec<ConditionData>,
    #[serde(default)]
    pub wind: Option<WindData>,
    #[serde(default)]
    pub rain: Option<RainData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainData {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionData {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindData {
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RainData {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
}

impl From<ApiResponse> for CurrentConditions {
    fn from(api: ApiResponse) -> Self {
        let (temperature, feels_like, humidity) = api
            .main
            .map_or((None, None, None), |m| (m.temp, m.feels_like, m.humidity));
        let (condition, description) = api
            .weather
            .into_iter()
            .next()
            .map_or((None, None), |w| (w.main, w.description));

        Self {
            location_name: api.name,
            temperature,
            feels_like,
            condition,
            description,
            humidity,
            wind_speed: api.wind.and_then(|w| w.speed),
            rain_last_hour: api.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_full_response() {
        let api: ApiResponse = serde_json::from_value(serde_json::json!({
            "name": "Seattle",
            "main": {"temp": 54.3, "feels_like": 52.1, "humidity": 81},
            "weather": [{"main": "Rain", "description": "light rain"}],
            "wind": {"speed": 6.9},
            "rain": {"1h": 0.42}
        }))
        .unwrap();

        let conditions = CurrentConditions::from(api);
        assert_eq!(conditions.location_name.as_deref(), Some("Seattle"));
        assert_eq!(conditions.condition.as_deref(), Some("Rain"));
        assert_eq!(conditions.humidity, Some(81));
        assert!((conditions.rain_last_hour - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_sections_become_none() {
        let api: ApiResponse = serde_json::from_value(serde_json::json!({"name": "Nowhere"})).unwrap();
        let conditions = CurrentConditions::from(api);
        assert!(conditions.temperature.is_none());
        assert!(conditions.condition.is_none());
        assert!(conditions.rain_last_hour.abs() < f64::EPSILON);
    }
}
