//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Source key is not one of the known data sources
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// Location is empty or otherwise unusable
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Trip does not name both an origin and a destination
    #[error("Invalid trip: {0}")]
    InvalidTrip(String),
}
