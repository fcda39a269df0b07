//! Crate-wide error taxonomy.

use thiserror::Error;

/// Errors surfaced by the serving stack
#[derive(Debug, Error)]
pub enum Error {
    /// No model has been loaded into the serving slot
    #[error("no model loaded; train one with `predecir train` or POST /retrain")]
    ModelUnavailable,

    /// Malformed input data (missing columns, unparseable rows)
    #[error("validation error: {0}")]
    Validation(String),

    /// Model fitting failed
    #[error("training error: {0}")]
    Training(String),

    /// Prediction log or store write failed
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Artifact or record encoding/decoding failed
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for serving operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_unavailable_message() {
        let e = Error::ModelUnavailable;
        assert!(e.to_string().contains("no model loaded"));
    }

    #[test]
    fn test_validation_message_carries_detail() {
        let e = Error::Validation("missing required columns: target".to_string());
        assert!(e.to_string().contains("missing required columns: target"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
