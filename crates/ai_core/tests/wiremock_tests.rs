//! Integration tests for the Anthropic inference engine using WireMock
//!
//! These tests mock the Messages API to verify client behavior without
//! calling the real service.

use ai_core::{AnthropicInferenceEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest};
use secrecy::SecretString;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn config_for_mock(base_url: &str) -> InferenceConfig {
    InferenceConfig {
        base_url: base_url.to_string(),
        api_key: Some(SecretString::from("test-key")),
        default_model: "test-model".to_string(),
        timeout_ms: 5000,
        max_tokens: 100,
        ..Default::default()
    }
}

fn engine_for(mock_server: &MockServer) -> AnthropicInferenceEngine {
    #[allow(clippy::expect_used)]
    AnthropicInferenceEngine::new(config_for_mock(&mock_server.uri()))
        .expect("Failed to create engine")
}

fn message_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "test-model",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 12, "output_tokens": 7}
    })
}

fn error_response(kind: &str, message: &str) -> serde_json::Value {
    serde_json::json!({"type": "error", "error": {"type": kind, "message": message}})
}

// =============================================================================
// Success scenarios
// =============================================================================

#[tokio::test]
async fn generate_sends_headers_and_returns_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "max_tokens": 100,
            "messages": [{"role": "user", "content": "Summarize my day"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_response("- Busy day")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine_for(&mock_server);
    let response = engine
        .generate(InferenceRequest::simple("Summarize my day"))
        .await
        .unwrap();

    assert_eq!(response.content, "- Busy day");
    assert_eq!(response.model, "test-model");
    assert_eq!(response.finish_reason.as_deref(), Some("end_turn"));
    let usage = response.usage.unwrap();
    assert_eq!(usage.total_tokens, 19);
}

#[tokio::test]
async fn system_prompt_is_sent_top_level() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(serde_json::json!({"system": "Be brief"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_response("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine_for(&mock_server);
    let response = engine
        .generate(InferenceRequest::with_system("Be brief", "Hello"))
        .await
        .unwrap();
    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn first_text_block_wins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "test-model",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let response = engine_for(&mock_server)
        .generate(InferenceRequest::simple("x"))
        .await
        .unwrap();
    assert_eq!(response.content, "first");
    assert!(response.usage.is_none());
}

// =============================================================================
// Error handling scenarios
// =============================================================================

#[tokio::test]
async fn missing_key_fails_without_calling_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_response("never")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = InferenceConfig {
        api_key: None,
        ..config_for_mock(&mock_server.uri())
    };
    let engine = AnthropicInferenceEngine::new(config).unwrap();
    let result = engine.generate(InferenceRequest::simple("x")).await;

    assert!(matches!(result, Err(InferenceError::NotConfigured(_))));
}

#[tokio::test]
async fn unauthorized_maps_to_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(error_response("authentication_error", "invalid x-api-key")),
        )
        .mount(&mock_server)
        .await;

    let result = engine_for(&mock_server)
        .generate(InferenceRequest::simple("x"))
        .await;

    match result {
        Err(InferenceError::Unauthorized(detail)) => {
            assert_eq!(detail, "authentication_error: invalid x-api-key");
        },
        other => unreachable!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(error_response("rate_limit_error", "slow down")),
        )
        .mount(&mock_server)
        .await;

    let result = engine_for(&mock_server)
        .generate(InferenceRequest::simple("x"))
        .await;
    assert!(matches!(result, Err(InferenceError::RateLimited)));
}

#[tokio::test]
async fn overloaded_maps_to_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(529).set_body_json(error_response("overloaded_error", "Overloaded")),
        )
        .mount(&mock_server)
        .await;

    let result = engine_for(&mock_server)
        .generate(InferenceRequest::simple("x"))
        .await;
    assert!(matches!(result, Err(InferenceError::ServerError(msg)) if msg.contains("Overloaded")));
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let result = engine_for(&mock_server)
        .generate(InferenceRequest::simple("x"))
        .await;
    assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
}

#[tokio::test]
async fn response_without_text_is_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "test-model",
            "content": []
        })))
        .mount(&mock_server)
        .await;

    let result = engine_for(&mock_server)
        .generate(InferenceRequest::simple("x"))
        .await;
    assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
}
