//! Health check handlers

use application::ServiceStatus;
use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Liveness response
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

/// Liveness check - is the server running?
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "healthy",
        message: "Daily Digest API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health response with per-service configuration state
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: ServiceStatus,
}

/// Report which sources and the model have credentials
///
/// Always 200; an unconfigured service is reported, not treated as unhealthy.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        services: state.digest_service.service_status(),
    })
}
