//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Digest generation through the real adapters against mocked upstreams
//! - Unconfigured sources surfacing as warnings
//! - Configuration layering from a config file

use domain::{DigestRequest, SourceData, SourceKind, WarningStage};
use infrastructure::{AppConfig, build_digest_service};
use secrecy::SecretString;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn anthropic_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-6",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 120, "output_tokens": 40}
    })
}

async fn mount_anthropic(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply(text)))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.inference.base_url = server.uri();
    config.inference.api_key = Some(SecretString::from("sk-ant-test"));
    config
}

// ============================================================================
// Digest generation
// ============================================================================

mod digest_tests {
    use super::*;

    #[tokio::test]
    async fn news_only_digest_carries_articles() {
        let server = MockServer::start().await;
        mount_anthropic(&server, "- Top story: X").await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param("apiKey", "news-key"))
            .and(query_param("pageSize", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 1,
                "articles": [{
                    "source": {"id": null, "name": "Y"},
                    "title": "X",
                    "description": "Z",
                    "url": "u",
                    "publishedAt": "t"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.news.base_url = server.uri();
        config.news.api_key = Some(SecretString::from("news-key"));

        let service = build_digest_service(&config).unwrap();
        let result = service
            .generate(&DigestRequest::only(&[SourceKind::News]))
            .await
            .unwrap();

        assert_eq!(result.summary, "- Top story: X");
        assert!(result.warnings.is_empty());

        let details = serde_json::to_value(&result.details).unwrap();
        assert_eq!(
            details,
            serde_json::json!({
                "news": [{
                    "title": "X",
                    "source": "Y",
                    "description": "Z",
                    "url": "u",
                    "publishedAt": "t"
                }]
            })
        );
    }

    #[tokio::test]
    async fn unconfigured_source_becomes_warning() {
        let server = MockServer::start().await;
        mount_anthropic(&server, "- Mild and dry").await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Portland,US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Portland",
                "main": {"temp": 61.0, "feels_like": 60.2, "humidity": 55},
                "weather": [{"main": "Clear", "description": "clear sky"}],
                "wind": {"speed": 4.6}
            })))
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.weather.base_url = server.uri();
        config.weather.api_key = Some(SecretString::from("owm-key"));

        let service = build_digest_service(&config).unwrap();
        let request =
            DigestRequest::only(&[SourceKind::Weather, SourceKind::Todos]).with_location("Portland,US");
        let result = service.generate(&request).await.unwrap();

        match result.details.get(SourceKind::Weather) {
            Some(SourceData::Weather(weather)) => {
                assert_eq!(weather.location.as_deref(), Some("Portland"));
                assert!(weather.precipitation.abs() < f64::EPSILON);
            },
            other => panic!("expected weather, got {other:?}"),
        }
        assert!(!result.details.contains(SourceKind::Todos));

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].stage, WarningStage::SourceFetch);
        assert_eq!(result.warnings[0].source.as_deref(), Some("todos"));
    }

    #[tokio::test]
    async fn completion_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_json(serde_json::json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .mount(&server)
            .await;

        let service = build_digest_service(&config_for(&server)).unwrap();
        let result = service.generate(&DigestRequest::only(&[])).await;

        assert!(result.is_err());
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn commute_routes_flow_into_traffic_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
[traffic]
api_key = "routes-key"

[[digest.commute_routes]]
name = "Work"
destination = "Bellevue, WA"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path(), |_| None).unwrap();
        let status = build_digest_service(&config).unwrap().service_status();

        assert!(status.traffic);
        assert!(!status.news);
    }
}
