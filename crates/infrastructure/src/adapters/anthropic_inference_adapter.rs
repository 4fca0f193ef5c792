//! Anthropic inference adapter - Implements InferencePort using ai_core
//!
//! Each prompt is sent as a single user turn; the summarizer builds the
//! whole instruction into that one message.

use std::sync::Arc;
use std::time::Instant;

use ai_core::{AnthropicInferenceEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest};
use application::{ApplicationError, InferencePort, InferenceResult};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter for the Anthropic Messages API
pub struct AnthropicInferenceAdapter {
    engine: Arc<dyn InferenceEngine>,
}

impl std::fmt::Debug for AnthropicInferenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicInferenceAdapter")
            .field("model", &self.engine.default_model())
            .field("configured", &self.engine.is_configured())
            .finish()
    }
}

impl AnthropicInferenceAdapter {
    /// Create a new adapter with the given configuration
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine =
            AnthropicInferenceEngine::new(config).map_err(|e| ApplicationError::Inference(e.to_string()))?;
        Ok(Self::from_engine(Arc::new(engine)))
    }

    #[must_use]
    pub fn from_engine(engine: Arc<dyn InferenceEngine>) -> Self {
        Self { engine }
    }

    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::NotConfigured(msg) => ApplicationError::NotConfigured(msg),
            InferenceError::RateLimited => ApplicationError::RateLimited,
            InferenceError::Timeout(ms) => ApplicationError::Timeout(format!("completion after {ms}ms")),
            other => ApplicationError::Inference(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for AnthropicInferenceAdapter {
    fn is_configured(&self) -> bool {
        self.engine.is_configured()
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.engine.default_model()))]
    async fn generate(&self, prompt: &str) -> Result<InferenceResult, ApplicationError> {
        let started = Instant::now();
        let response = self
            .engine
            .generate(InferenceRequest::simple(prompt))
            .await
            .map_err(Self::map_error)?;

        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let tokens_used = response.usage.map(|u| u.total_tokens);
        debug!(latency_ms, tokens = ?tokens_used, "Completion received");

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used,
            latency_ms,
        })
    }
}
