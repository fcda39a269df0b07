//! HTTP request handlers.
//!
//! Axum handlers for the prediction service API.

use crate::dataset::HousingDataset;
use crate::error::Error;
use crate::features::HousingFeatures;
use crate::monitor::PROMETHEUS_CONTENT_TYPE;
use crate::server::{
    state::AppState, ErrorResponse, HealthResponse, MessageResponse, PredictResponse,
    WelcomeResponse,
};
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Generate a request ID for log correlation
fn request_id() -> String {
    format!("req-{:016x}", rand::random::<u64>())
}

/// Map an error to the status code it rides on
fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Training(_) | Error::Persistence(_) | Error::Serialization(_) | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

/// Static welcome handler
pub async fn welcome() -> (StatusCode, Json<WelcomeResponse>) {
    let body = WelcomeResponse {
        service: "California Housing Predictor".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ["/predict", "/retrain", "/metrics", "/custom-metrics", "/health"]
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    (StatusCode::OK, Json(body))
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        model_loaded: state.model.is_loaded(),
        predictions_served: state.metrics.predictions_total(),
    };

    (StatusCode::OK, Json(health))
}

/// Predict the price for one feature vector
pub async fn predict(State(state): State<AppState>, Json(input): Json<HousingFeatures>) -> Response {
    let req_id = request_id();

    match state.serve_prediction(input) {
        Ok(predicted_price) => {
            (StatusCode::OK, Json(PredictResponse { predicted_price })).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %req_id, error = %e, "prediction failed");
            error_response(error_status(&e), &e.to_string())
        }
    }
}

/// Retrain from an uploaded CSV batch.
///
/// The first multipart field is taken as the CSV file.
pub async fn retrain(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let req_id = request_id();

    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return error_response(StatusCode::BAD_REQUEST, "missing CSV file upload");
        }
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("malformed multipart body: {e}"),
            );
        }
    };

    let csv = match field.text().await {
        Ok(text) => text,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("unreadable upload: {e}"));
        }
    };

    retrain_from_csv(&state, &csv, &req_id)
}

/// The retrain flow: validate, merge with the base dataset, refit, audit.
pub(crate) fn retrain_from_csv(state: &AppState, csv: &str, req_id: &str) -> Response {
    let upload = match HousingDataset::from_csv_str(csv) {
        Ok(upload) if !upload.is_empty() => upload,
        Ok(_) => {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, "upload contains no data rows");
        }
        Err(e) => {
            tracing::warn!(request_id = %req_id, error = %e, "rejected retraining upload");
            return error_response(error_status(&e), &e.to_string());
        }
    };

    match state.retrain_with_upload(&upload) {
        Ok(outcome) => {
            let message = format!(
                "model retrained on {} rows ({} new) and saved to {}",
                outcome.total_rows,
                outcome.new_rows,
                state.model.artifact_path().display()
            );
            tracing::info!(request_id = %req_id, "{message}");
            (StatusCode::OK, Json(MessageResponse { message })).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %req_id, error = %e, "retraining failed");
            error_response(error_status(&e), &e.to_string())
        }
    }
}

/// Prometheus exposition of the request counters
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.export(),
    )
        .into_response()
}

/// Store-derived metrics: total rows and mean prediction
pub async fn custom_metrics(State(state): State<AppState>) -> Response {
    let req_id = request_id();

    match state.store.aggregate() {
        Ok(Some(stats)) => (StatusCode::OK, Json(stats)).into_response(),
        Ok(None) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "no predictions recorded yet; POST /predict first".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(request_id = %req_id, error = %e, "metrics aggregation failed");
            error_response(error_status(&e), &e.to_string())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
