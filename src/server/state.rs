//! Shared application state and the core request flows.

use crate::config::ServerConfig;
use crate::dataset::HousingDataset;
use crate::error::Result;
use crate::features::HousingFeatures;
use crate::model::{ModelHandle, RetrainOutcome};
use crate::monitor::ServiceMetrics;
use crate::server::round3;
use crate::storage::{PredictionLog, PredictionRecord, RetrainAuditLog, SqliteStore};
use std::sync::Arc;
use std::time::Instant;

/// Everything a handler needs, shared across requests
#[derive(Debug, Clone)]
pub struct AppState {
    /// The hot-swappable current model
    pub model: Arc<ModelHandle>,
    /// SQLite prediction log store
    pub store: Arc<SqliteStore>,
    /// Flat-file JSONL prediction log
    pub prediction_log: Arc<PredictionLog>,
    /// Retraining audit trail
    pub audit_log: Arc<RetrainAuditLog>,
    /// Process-wide request counters
    pub metrics: Arc<ServiceMetrics>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    started_at: Instant,
}

impl AppState {
    /// Open all persistence handles and load the model artifact if present
    pub fn new(config: ServerConfig) -> Result<Self> {
        let model = ModelHandle::open(&config.artifact_path)?;
        if !model.is_loaded() {
            tracing::warn!(
                artifact = %config.artifact_path.display(),
                "no model artifact found; /predict will fail until a retrain installs one"
            );
        }

        std::fs::create_dir_all(&config.log_dir)?;
        let store = SqliteStore::open(config.store_path())?;
        let prediction_log = PredictionLog::open(config.prediction_log_path())?;
        let audit_log = RetrainAuditLog::open(config.audit_log_path())?;

        Ok(Self {
            model: Arc::new(model),
            store: Arc::new(store),
            prediction_log: Arc::new(prediction_log),
            audit_log: Arc::new(audit_log),
            metrics: Arc::new(ServiceMetrics::new()),
            config: Arc::new(config),
            started_at: Instant::now(),
        })
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// The predict flow: model call, both persistence writes, then the
    /// counter.
    ///
    /// Any failure aborts before the counter moves, so the counter only ever
    /// counts fully recorded predictions.
    pub fn serve_prediction(&self, input: HousingFeatures) -> Result<f64> {
        let prediction = round3(self.model.predict(&input)?);

        let record = PredictionRecord::now(input, prediction);
        self.prediction_log.append(&record)?;
        self.store.append(&record)?;
        self.metrics.record_prediction();

        Ok(prediction)
    }

    /// The retrain flow: merge the upload with the base dataset (base rows
    /// first), refit, persist, swap, and append one audit line.
    pub fn retrain_with_upload(&self, upload: &HousingDataset) -> Result<RetrainOutcome> {
        let base = HousingDataset::from_csv_path(&self.config.base_data_path)?;
        let combined = HousingDataset::concat(&base, upload);

        let outcome = self.model.retrain(&combined, upload.len())?;
        self.audit_log.append(outcome.total_rows, outcome.new_rows)?;
        self.metrics.record_retrain();

        Ok(outcome)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_without_artifact_starts_unloaded() {
        let dir = tempfile::tempdir().expect("operation should succeed");
        let config = ServerConfig::default()
            .with_artifact_path(dir.path().join("model.apr"))
            .with_base_data_path(dir.path().join("base.csv"))
            .with_log_dir(dir.path().join("logs"));

        let state = AppState::new(config).expect("operation should succeed");
        assert!(!state.model.is_loaded());
        assert_eq!(state.metrics.predictions_total(), 0);
        assert_eq!(state.store.count().expect("operation should succeed"), 0);
    }

    #[test]
    fn test_new_state_creates_log_dir() {
        let dir = tempfile::tempdir().expect("operation should succeed");
        let log_dir = dir.path().join("var").join("logs");
        let config = ServerConfig::default()
            .with_artifact_path(dir.path().join("model.apr"))
            .with_log_dir(&log_dir);

        let _state = AppState::new(config).expect("operation should succeed");
        assert!(log_dir.exists());
    }

    #[test]
    fn test_serve_prediction_without_model_counts_nothing() {
        let dir = tempfile::tempdir().expect("operation should succeed");
        let config = ServerConfig::default()
            .with_artifact_path(dir.path().join("model.apr"))
            .with_log_dir(dir.path().join("logs"));
        let state = AppState::new(config).expect("operation should succeed");

        let result = state.serve_prediction(HousingFeatures::example_berkeley());
        assert!(result.is_err());
        assert_eq!(state.metrics.predictions_total(), 0);
        assert_eq!(state.store.count().expect("operation should succeed"), 0);
    }
}
