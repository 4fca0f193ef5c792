//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use application::{
    CalendarPort, DigestConfig, DigestService, EmailPort, InferencePort, InferenceResult, NewsPort,
    SourcePorts, TodoPort, TrafficPort, WeatherPort, error::ApplicationError,
};
use async_trait::async_trait;
use axum::{body::Body, http::StatusCode};
use axum_test::TestServer;
use domain::{
    CalendarEventRecord, EmailRecord, Location, NewsArticleRecord, TodoRecord, TrafficReport,
    TrafficRouteRecord, Trip, WeatherRecord,
};
use infrastructure::ServerConfig;
use presentation_http::{
    middleware::REQUEST_ID_HEADER,
    routes::{create_app, create_router},
    state::AppState,
};
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// Port fakes
// ============================================================================

/// Every source port, never configured
struct Unconfigured;

fn not_configured<T>() -> Result<T, ApplicationError> {
    Err(ApplicationError::NotConfigured("fake".to_string()))
}

#[async_trait]
impl EmailPort for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn fetch_unread(&self) -> Result<Vec<EmailRecord>, ApplicationError> {
        not_configured()
    }
}

#[async_trait]
impl CalendarPort for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn fetch_upcoming(&self) -> Result<Vec<CalendarEventRecord>, ApplicationError> {
        not_configured()
    }
}

#[async_trait]
impl NewsPort for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn fetch_top_stories(&self) -> Result<Vec<NewsArticleRecord>, ApplicationError> {
        not_configured()
    }
}

#[async_trait]
impl WeatherPort for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn fetch_weather(&self, _location: &Location) -> Result<WeatherRecord, ApplicationError> {
        not_configured()
    }
}

#[async_trait]
impl TrafficPort for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn fetch_commute(&self, _location: &Location) -> Result<TrafficReport, ApplicationError> {
        not_configured()
    }

    async fn fetch_route(&self, _trip: &Trip) -> Result<TrafficRouteRecord, ApplicationError> {
        not_configured()
    }
}

#[async_trait]
impl TodoPort for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn fetch_todos(&self) -> Result<Vec<TodoRecord>, ApplicationError> {
        not_configured()
    }
}

/// News source returning fixed headlines
struct FixedNews(Vec<NewsArticleRecord>);

#[async_trait]
impl NewsPort for FixedNews {
    fn is_configured(&self) -> bool {
        true
    }

    async fn fetch_top_stories(&self) -> Result<Vec<NewsArticleRecord>, ApplicationError> {
        Ok(self.0.clone())
    }
}

/// Weather source that remembers which location it was asked about
#[derive(Default)]
struct RecordingWeather(Mutex<Vec<String>>);

impl RecordingWeather {
    fn requested(&self) -> Vec<String> {
        self.0.lock().expect("lock").clone()
    }
}

#[async_trait]
impl WeatherPort for RecordingWeather {
    fn is_configured(&self) -> bool {
        true
    }

    async fn fetch_weather(&self, location: &Location) -> Result<WeatherRecord, ApplicationError> {
        self.0.lock().expect("lock").push(location.as_str().to_string());
        Ok(WeatherRecord {
            location: Some(location.as_str().to_string()),
            temperature: Some(52.0),
            feels_like: Some(49.5),
            condition: Some("Clouds".to_string()),
            description: Some("overcast clouds".to_string()),
            humidity: Some(80),
            wind_speed: Some(6.2),
            precipitation: 0.0,
        })
    }
}

/// Completion fake
enum FakeInference {
    Reply(&'static str),
    Fail(&'static str),
    Slow(Duration),
    Missing,
}

#[async_trait]
impl InferencePort for FakeInference {
    fn is_configured(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    async fn generate(&self, _prompt: &str) -> Result<InferenceResult, ApplicationError> {
        match self {
            Self::Reply(text) => Ok(InferenceResult::text(*text, "fake-model")),
            Self::Fail(message) => Err(ApplicationError::ExternalService((*message).to_string())),
            Self::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(InferenceResult::text("too late", "fake-model"))
            },
            Self::Missing => Err(ApplicationError::NotConfigured("language model".to_string())),
        }
    }
}

fn headline() -> NewsArticleRecord {
    NewsArticleRecord {
        title: Some("Ferry schedule changes".to_string()),
        source: Some("Harbor Times".to_string()),
        description: Some("Weekend sailings reduced".to_string()),
        url: Some("https://news.example/ferry".to_string()),
        published_at: Some("2026-10-19T06:00:00Z".to_string()),
    }
}

fn sources(news: Arc<dyn NewsPort>) -> SourcePorts {
    let none = Arc::new(Unconfigured);
    SourcePorts {
        email: none.clone(),
        news,
        calendar: none.clone(),
        weather: none.clone(),
        traffic: none.clone(),
        todos: none,
    }
}

fn digest_config() -> DigestConfig {
    DigestConfig::new(Location::new("Seattle,US").expect("valid location"))
}

fn state_with(news: Arc<dyn NewsPort>, inference: FakeInference, config: DigestConfig) -> AppState {
    let service = DigestService::new(sources(news), Arc::new(inference), config);
    AppState::new(Arc::new(service))
}

fn news_state(inference: FakeInference) -> AppState {
    state_with(Arc::new(FixedNews(vec![headline()])), inference, digest_config())
}

fn server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

// ============================================================================
// Liveness and health
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn root_is_healthy() {
        let server = server(news_state(FakeInference::Missing));

        let response = server.get("/").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn nothing_configured_reports_all_false() {
        let state = state_with(Arc::new(Unconfigured), FakeInference::Missing, digest_config());
        let server = server(state);

        let response = server.get("/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "status": "healthy",
            "services": {
                "email": false,
                "news": false,
                "calendar": false,
                "weather": false,
                "traffic": false,
                "todos": false,
                "claude": false
            }
        }));
    }

    #[tokio::test]
    async fn configured_services_report_true() {
        let server = server(news_state(FakeInference::Reply("ok")));

        let body: serde_json::Value = server.get("/health").await.json();
        assert_eq!(body["services"]["news"], true);
        assert_eq!(body["services"]["claude"], true);
        assert_eq!(body["services"]["email"], false);
    }
}

// ============================================================================
// Digest generation
// ============================================================================

mod digest_tests {
    use super::*;

    #[tokio::test]
    async fn news_only_digest() {
        let server = server(news_state(FakeInference::Reply("Ferries are running less this weekend.")));

        let response = server
            .post("/digest")
            .json(&json!({
                "include_email": false,
                "include_calendar": false,
                "include_weather": false,
                "include_traffic": false,
                "include_todos": false
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["summary"], "Ferries are running less this weekend.");
        assert_eq!(body["details"]["news"][0]["title"], "Ferry schedule changes");
        assert_eq!(body["details"]["news"][0]["publishedAt"], "2026-10-19T06:00:00Z");
        assert_eq!(body["details"].as_object().map(serde_json::Map::len), Some(1));
        assert!(body["timestamp"].is_string());
        assert!(body.get("warnings").is_none());
    }

    #[tokio::test]
    async fn unconfigured_source_becomes_warning() {
        let server = server(news_state(FakeInference::Reply("summary")));

        let response = server
            .post("/digest")
            .json(&json!({
                "include_email": false,
                "include_calendar": false,
                "include_weather": false,
                "include_traffic": false
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        let warnings = body["warnings"].as_array().expect("warnings present");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0]["source"], "todos");
        assert!(body["details"].get("todos").is_none());
    }

    #[tokio::test]
    async fn quick_digest_uses_defaults() {
        let server = server(news_state(FakeInference::Reply("quick summary")));

        let response = server.post("/digest/quick").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["summary"], "quick summary");
        assert_eq!(body["details"]["news"][0]["source"], "Harbor Times");
    }

    #[tokio::test]
    async fn empty_location_falls_back_to_default() {
        let weather = Arc::new(RecordingWeather::default());
        let mut ports = sources(Arc::new(FixedNews(vec![headline()])));
        ports.weather = weather.clone();
        let service = DigestService::new(ports, Arc::new(FakeInference::Reply("Cloudy in Seattle.")), digest_config());
        let server = server(AppState::new(Arc::new(service)));

        let response = server
            .post("/digest")
            .json(&json!({
                "include_email": false,
                "include_calendar": false,
                "include_traffic": false,
                "include_todos": false,
                "location": ""
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["details"]["weather"]["location"], "Seattle,US");
        assert!(body.get("warnings").is_none());
        assert_eq!(weather.requested(), vec!["Seattle,US".to_string()]);
    }

    #[tokio::test]
    async fn empty_body_enables_every_source() {
        let server = server(news_state(FakeInference::Reply("all")));

        let response = server.post("/digest").json(&json!({})).await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        // Five unconfigured sources were asked for
        assert_eq!(body["warnings"].as_array().map(Vec::len), Some(5));
    }
}

// ============================================================================
// Validation and failures
// ============================================================================

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn overlong_location_is_rejected() {
        let server = server(news_state(FakeInference::Reply("unused")));

        let response = server
            .post("/digest")
            .json(&json!({ "location": "x".repeat(201) }))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "validation_error");
        assert!(body["details"].as_str().is_some_and(|d| d.contains("location")));
    }

    #[tokio::test]
    async fn completion_failure_returns_500_with_details() {
        let server = server(news_state(FakeInference::Fail("model overloaded")));

        let response = server.post("/digest/quick").expect_failure().await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({
            "error": "Failed to generate digest",
            "code": "digest_failed",
            "details": "External service error: model overloaded"
        }));
    }

    #[tokio::test]
    async fn failure_urls_are_redacted_outside_debug() {
        let server = server(news_state(FakeInference::Fail(
            "error sending request for url (https://api.anthropic.com/v1/messages)",
        )));

        let body: serde_json::Value = server.post("/digest/quick").expect_failure().await.json();
        assert_eq!(
            body["details"],
            "External service error: error sending request for url ([redacted])"
        );
    }

    #[tokio::test]
    async fn failure_paths_are_hidden_outside_debug() {
        let server = server(news_state(FakeInference::Fail("failed to read /home/pi/token.json")));

        let body: serde_json::Value = server.post("/digest/quick").expect_failure().await.json();
        assert_eq!(body["details"], "An error occurred processing your request");
    }

    #[tokio::test]
    async fn failure_details_are_raw_in_debug() {
        let state = news_state(FakeInference::Fail("connect to https://api.anthropic.com failed"))
            .with_expose_errors(true);
        let server = server(state);

        let body: serde_json::Value = server.post("/digest/quick").expect_failure().await.json();
        assert!(body["details"].as_str().is_some_and(|d| d.contains("api.anthropic.com")));
    }

    #[tokio::test]
    async fn slow_completion_hits_request_deadline() {
        let config = digest_config().with_request_timeout(Duration::from_millis(50));
        let state = state_with(
            Arc::new(FixedNews(vec![headline()])),
            FakeInference::Slow(Duration::from_secs(5)),
            config,
        );
        let server = server(state);

        let response = server.post("/digest/quick").expect_failure().await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert!(body["details"].as_str().is_some_and(|d| d.starts_with("Timed out")));
    }
}

// ============================================================================
// Middleware stack
// ============================================================================

mod middleware_tests {
    use super::*;

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = create_app(news_state(FakeInference::Missing), &ServerConfig::default());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn wildcard_origin_allows_any() {
        let app = create_app(news_state(FakeInference::Missing), &ServerConfig::default());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .header("origin", "https://dashboard.example")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn listed_origin_is_echoed() {
        let server_config = ServerConfig {
            allowed_origins: vec!["https://dashboard.example".to_string()],
            ..ServerConfig::default()
        };
        let app = create_app(news_state(FakeInference::Missing), &server_config);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .header("origin", "https://dashboard.example")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://dashboard.example"
        );
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server_config = ServerConfig {
            max_body_size_json_bytes: 64,
            ..ServerConfig::default()
        };
        let app = create_app(news_state(FakeInference::Missing), &server_config);

        let body = format!(r#"{{"location": "{}"}}"#, "x".repeat(128));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/digest")
                    .header("content-type", "application/json")
                    .header("content-length", body.len())
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
