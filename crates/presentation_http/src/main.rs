//! Daily digest HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{path::Path, sync::Arc, time::Duration};

use infrastructure::{AppConfig, build_digest_service, init_telemetry, log_credential_report};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in production
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::load()?;
    init_telemetry(&config.telemetry.clone().with_debug(config.server.debug))?;

    info!("Daily Digest v{} starting", env!("CARGO_PKG_VERSION"));
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "Failed to read .env file");
        }
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        model = %config.inference.default_model,
        location = %config.digest.default_location,
        debug = config.server.debug,
        "Configuration loaded"
    );

    log_credential_report(&config, Path::new("."));

    let digest_service = build_digest_service(&config)?;
    let state = AppState::new(Arc::new(digest_service)).with_expose_errors(config.server.debug);
    let app = routes::create_app(state, &config.server);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("Waiting up to {:?} for in-flight digests to finish", timeout);
}
