//! REST/HTTP serving surface.
//!
//! Axum service exposing the prediction, retraining, and metrics endpoints.
//! Status codes reflect outcomes on every endpoint: error payloads always
//! ride on error statuses, so callers never have to inspect a 200 body to
//! detect failure.

mod api;
mod handlers;
mod state;

pub use api::{routes, run};
pub use handlers::*;
pub use state::AppState;

use serde::{Deserialize, Serialize};

/// Round a prediction to the serving precision of 3 decimal places
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Successful prediction response
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted median house value, rounded to 3 decimal places
    pub predicted_price: f64,
}

/// Informational response (retrain success, empty-store metrics)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error payload; always paired with an error status code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Static welcome payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server status
    pub status: String,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Whether a model is loaded into the serving slot
    pub model_loaded: bool,
    /// Predictions served since startup
    pub predictions_served: u64,
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Property Tests
// =============================================================================
