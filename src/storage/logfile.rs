//! Flat-file logs: JSONL prediction records and the retraining audit trail.

use super::PredictionRecord;
use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Persistence(format!("failed to open log {}: {e}", path.display())))
}

fn lock_file<'a>(file: &'a Mutex<File>, path: &Path) -> Result<MutexGuard<'a, File>> {
    file.lock()
        .map_err(|e| Error::Persistence(format!("failed to lock log {}: {e}", path.display())))
}

/// Append-only JSONL log of served predictions
#[derive(Debug)]
pub struct PredictionLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl PredictionLog {
    /// Open the log for appending, creating it (and parent dirs) if needed
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        Ok(Self { file: Mutex::new(file), path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line
    pub fn append(&self, record: &PredictionRecord) -> Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| Error::Serialization(format!("failed to encode record: {e}")))?;

        let mut file = lock_file(&self.file, &self.path)?;
        writeln!(file, "{line}")
            .map_err(|e| Error::Persistence(format!("failed to append record: {e}")))?;
        Ok(())
    }
}

/// Append-only plain-text record of retraining events
#[derive(Debug)]
pub struct RetrainAuditLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl RetrainAuditLog {
    /// Open the audit log for appending, creating it (and parent dirs) if needed
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        Ok(Self { file: Mutex::new(file), path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one audit line: when, how many rows in total, how many were new
    pub fn append(&self, total_rows: usize, new_rows: usize) -> Result<()> {
        let mut file = lock_file(&self.file, &self.path)?;
        writeln!(
            file,
            "{} | total_rows={total_rows} | new_rows={new_rows}",
            chrono::Utc::now().to_rfc3339()
        )
        .map_err(|e| Error::Persistence(format!("failed to append audit line: {e}")))?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::HousingFeatures;

    #[test]
    fn test_prediction_log_appends_one_line_per_record() {
        let dir = tempfile::tempdir().expect("operation should succeed");
        let log = PredictionLog::open(dir.path().join("predictions.jsonl"))
            .expect("operation should succeed");

        for i in 0..3 {
            let record = PredictionRecord::now(HousingFeatures::example_berkeley(), f64::from(i));
            log.append(&record).expect("operation should succeed");
        }

        let content = std::fs::read_to_string(log.path()).expect("operation should succeed");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let parsed: PredictionRecord =
            serde_json::from_str(lines[2]).expect("operation should succeed");
        assert!((parsed.prediction - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_prediction_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("operation should succeed");
        let nested = dir.path().join("logs").join("predictions.jsonl");
        let log = PredictionLog::open(&nested).expect("operation should succeed");

        log.append(&PredictionRecord::now(HousingFeatures::example_berkeley(), 1.0))
            .expect("operation should succeed");
        assert!(nested.exists());
    }

    #[test]
    fn test_audit_log_line_format() {
        let dir = tempfile::tempdir().expect("operation should succeed");
        let log = RetrainAuditLog::open(dir.path().join("retraining.log"))
            .expect("operation should succeed");

        log.append(20645, 5).expect("operation should succeed");

        let content = std::fs::read_to_string(log.path()).expect("operation should succeed");
        let line = content.lines().next().expect("one line expected");
        assert!(line.contains("total_rows=20645"));
        assert!(line.contains("new_rows=5"));

        let timestamp = line.split(" | ").next().expect("timestamp field expected");
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_reopened_log_appends_rather_than_truncates() {
        let dir = tempfile::tempdir().expect("operation should succeed");
        let path = dir.path().join("retraining.log");

        RetrainAuditLog::open(&path)
            .expect("operation should succeed")
            .append(10, 10)
            .expect("operation should succeed");
        RetrainAuditLog::open(&path)
            .expect("operation should succeed")
            .append(15, 5)
            .expect("operation should succeed");

        let content = std::fs::read_to_string(&path).expect("operation should succeed");
        assert_eq!(content.lines().count(), 2);
    }
}
