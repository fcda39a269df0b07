//! Prediction log store.
//!
//! Every served prediction is recorded twice: one JSON line in a flat
//! append-only log, and one row in a SQLite `logs` table. A third plain-text
//! log records retraining events. Records are immutable and never deleted by
//! the service.

mod logfile;
mod sqlite;

pub use logfile::{PredictionLog, RetrainAuditLog};
pub use sqlite::{PredictionStats, SqliteStore};

use crate::features::HousingFeatures;
use serde::{Deserialize, Serialize};

/// One served prediction: input vector, rounded output, and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    /// The request's feature vector
    pub input: HousingFeatures,
    /// The returned prediction, rounded to 3 decimal places
    pub prediction: f64,
}

impl PredictionRecord {
    /// Record stamped with the current UTC time
    pub fn now(input: HousingFeatures, prediction: f64) -> Self {
        Self { timestamp: chrono::Utc::now().to_rfc3339(), input, prediction }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_input_columns() {
        let record = PredictionRecord::now(HousingFeatures::example_berkeley(), 4.526);
        let json = serde_json::to_value(&record).expect("operation should succeed");

        assert!(json["timestamp"].is_string());
        assert!(json["input"]["MedInc"].is_number());
        assert!((json["prediction"].as_f64().expect("operation should succeed") - 4.526).abs()
            < f64::EPSILON);
    }

    #[test]
    fn test_record_timestamp_is_rfc3339() {
        let record = PredictionRecord::now(HousingFeatures::example_berkeley(), 1.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }
}
