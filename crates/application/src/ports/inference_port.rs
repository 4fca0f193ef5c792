//! Inference port - Interface for LLM inference

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of an inference call
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Generated response content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Number of tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

impl InferenceResult {
    /// Result carrying only text, for callers that do not track usage
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            tokens_used: None,
            latency_ms: 0,
        }
    }
}

/// Port for single-prompt text completion
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InferencePort: Send + Sync {
    /// Whether an API key for the model provider is present
    fn is_configured(&self) -> bool;

    /// Complete a single user prompt
    async fn generate(&self, prompt: &str) -> Result<InferenceResult, ApplicationError>;
}
