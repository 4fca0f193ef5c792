//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the integration crates and
//! owns configuration loading, logging setup and service wiring.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod wiring;

pub use adapters::*;
pub use config::{AppConfig, CommuteRoute, DigestAppConfig, ServerConfig};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
pub use wiring::{GoogleCredentialSource, build_digest_service, google_credential_source, log_credential_report};
