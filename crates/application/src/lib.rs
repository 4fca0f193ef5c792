//! Application layer - Use cases and orchestration
//!
//! Defines the ports each data source and the language model must implement,
//! and the services that fan out to them and turn their output into a digest.

pub mod error;
pub mod ports;
pub mod prompts;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
