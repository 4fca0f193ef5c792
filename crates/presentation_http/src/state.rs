//! Application state shared across handlers

use std::sync::Arc;

use application::DigestService;

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Digest orchestration service
    pub digest_service: Arc<DigestService>,

    /// Pass raw error messages through to API responses (debug mode)
    pub expose_errors: bool,
}

impl AppState {
    /// Create state around a digest service
    #[must_use]
    pub fn new(digest_service: Arc<DigestService>) -> Self {
        Self {
            digest_service,
            expose_errors: false,
        }
    }

    /// Toggle raw error messages in responses
    #[must_use]
    pub const fn with_expose_errors(mut self, expose: bool) -> Self {
        self.expose_errors = expose;
        self
    }
}
