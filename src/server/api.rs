//! Router assembly and the serve loop.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::server::{handlers, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// Build the service router over shared state
pub fn routes(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/retrain", post(handlers::retrain))
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/custom-metrics", get(handlers::custom_metrics))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}

/// Open state from the config and serve until the process is stopped
pub async fn run(config: ServerConfig) -> Result<()> {
    let address = config.address;
    let state = AppState::new(config)?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| Error::Persistence(format!("failed to bind {address}: {e}")))?;

    tracing::info!(%address, "serving California housing predictions");
    axum::serve(listener, routes(state))
        .await
        .map_err(|e| Error::Persistence(format!("server error: {e}")))?;

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
