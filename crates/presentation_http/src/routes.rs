//! Route definitions and middleware stack

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/digest", post(handlers::digest::generate_digest))
        .route("/digest/quick", post(handlers::digest::quick_digest))
        .with_state(state)
}

/// Create the router wrapped in the server's middleware stack
///
/// Outermost first: request ID span, tracing, CORS, body limit.
pub fn create_app(state: AppState, server: &ServerConfig) -> Router {
    create_router(state)
        .layer(RequestBodyLimitLayer::new(server.max_body_size_json_bytes))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new())
}

/// CORS from the configured origins; `*` or an empty list allows any origin
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .trim()
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %origin, "Ignoring unparseable CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
