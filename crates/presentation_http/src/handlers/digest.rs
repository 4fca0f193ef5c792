//! Digest handlers

use axum::{Json, extract::State};
use domain::{DigestRequest, DigestResult};
use tracing::{debug, error, info, instrument};

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Generate a digest for the requested sources
#[instrument(skip_all)]
pub async fn generate_digest(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<DigestRequest>,
) -> Result<Json<DigestResult>, ApiError> {
    debug!(sources = ?request.enabled_sources(), location = ?request.location, "Digest requested");
    run_digest(&state, &request).await
}

/// Generate a digest with every source enabled and the default location
#[instrument(skip_all)]
pub async fn quick_digest(State(state): State<AppState>) -> Result<Json<DigestResult>, ApiError> {
    run_digest(&state, &DigestRequest::default()).await
}

async fn run_digest(state: &AppState, request: &DigestRequest) -> Result<Json<DigestResult>, ApiError> {
    match state.digest_service.generate(request).await {
        Ok(result) => {
            info!(
                sources = result.details.len(),
                warnings = result.warnings.len(),
                "Digest served"
            );
            Ok(Json(result))
        },
        Err(e) => {
            error!(error = %e, "Digest generation failed");
            Err(ApiError::digest_failed(&e, state.expose_errors))
        },
    }
}
