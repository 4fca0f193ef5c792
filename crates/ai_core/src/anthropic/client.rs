//! Anthropic Messages API client implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{InferenceEngine, InferenceRequest, InferenceResponse, TokenUsage};

/// Inference engine backed by the Anthropic Messages API
pub struct AnthropicInferenceEngine {
    client: Client,
    config: InferenceConfig,
}

impl std::fmt::Debug for AnthropicInferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicInferenceEngine")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.default_model)
            .field("configured", &self.config.has_api_key())
            .finish_non_exhaustive()
    }
}

impl AnthropicInferenceEngine {
    /// Create a new engine
    ///
    /// A missing API key is allowed here so that health reporting works;
    /// [`generate`](InferenceEngine::generate) refuses to send without one.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            configured = config.has_api_key(),
            "Initialized Anthropic inference engine"
        );

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn resolve_model<'a>(&'a self, request: &'a InferenceRequest) -> &'a str {
        request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model)
    }
}

/// Messages API request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<MessageParam<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Pull `type: message` out of an API error body, falling back to the raw text
fn describe_error(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| body.to_string(),
        |envelope| format!("{}: {}", envelope.error.error_type, envelope.error.message),
    )
}

#[async_trait]
impl InferenceEngine for AnthropicInferenceEngine {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn generate(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let Some(api_key) = self.config.api_key.as_ref().filter(|_| self.config.has_api_key())
        else {
            return Err(InferenceError::NotConfigured(
                "no Anthropic API key configured".to_string(),
            ));
        };

        let body = MessagesRequest {
            model: self.resolve_model(&request),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            messages: request
                .messages
                .iter()
                .map(|m| MessageParam {
                    role: &m.role,
                    content: &m.content,
                })
                .collect(),
            system: request
                .system
                .as_deref()
                .or(self.config.system_prompt.as_deref()),
            temperature: request.temperature.or(self.config.temperature),
        };

        debug!(messages = body.messages.len(), "Sending request to Messages API");
        let started = Instant::now();

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::from_reqwest(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = describe_error(&text);
            warn!(status = %status, detail = %detail, "Inference request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    InferenceError::Unauthorized(detail)
                },
                StatusCode::TOO_MANY_REQUESTS => InferenceError::RateLimited,
                s if s.is_server_error() => {
                    InferenceError::ServerError(format!("HTTP {s}: {detail}"))
                },
                s => InferenceError::RequestFailed(format!("HTTP {s}: {detail}")),
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| {
                InferenceError::InvalidResponse("response has no text content".to_string())
            })?;

        let usage = parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        debug!(
            tokens = ?usage,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Inference completed"
        );

        Ok(InferenceResponse {
            content,
            model: parsed.model,
            usage,
            finish_reason: parsed.stop_reason,
        })
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
