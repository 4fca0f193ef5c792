//! AI Core - Inference engine abstraction
//!
//! Provides a provider-neutral request/response model and an engine for the
//! Anthropic Messages API.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod ports;

pub use anthropic::AnthropicInferenceEngine;
pub use config::InferenceConfig;
pub use error::InferenceError;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};
