//! Anthropic Messages API engine

mod client;

pub use client::AnthropicInferenceEngine;
