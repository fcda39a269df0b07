//! SQLite store for served predictions.
//!
//! One long-lived WAL-mode connection guarded by a mutex; each operation
//! acquires the lock for its single statement. The `logs` table mirrors the
//! flat-file record: timestamp, the eight feature columns, and the rounded
//! prediction.

use super::PredictionRecord;
use crate::error::{Error, Result};
use crate::features::HousingFeatures;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// On-demand aggregate over the full `logs` table
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PredictionStats {
    /// Total predictions recorded
    pub total_requests: u64,
    /// Arithmetic mean of recorded predictions, rounded to 3 decimals
    pub average_prediction: f64,
}

/// Append-only SQLite log of served predictions
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the prediction database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Error::Persistence(format!("failed to open prediction db: {e}")))?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Persistence(format!("failed to open in-memory db: {e}")))?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::Persistence(format!("failed to acquire store lock: {e}")))
    }

    /// Append one prediction record
    pub fn append(&self, record: &PredictionRecord) -> Result<()> {
        let conn = self.lock_conn()?;
        let row = record.input.to_array();

        conn.execute(
            "INSERT INTO logs VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.timestamp,
                row[0],
                row[1],
                row[2],
                row[3],
                row[4],
                row[5],
                row[6],
                row[7],
                record.prediction,
            ],
        )
        .map_err(|e| Error::Persistence(format!("failed to insert prediction: {e}")))?;

        Ok(())
    }

    /// Total rows in the store
    pub fn count(&self) -> Result<u64> {
        let conn = self.lock_conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))
            .map_err(|e| Error::Persistence(format!("failed to count predictions: {e}")))?;
        Ok(count as u64)
    }

    /// Scan the full table for row count and mean prediction.
    ///
    /// Returns `None` when no predictions have been recorded; callers report
    /// that explicitly instead of a numeric zero. Every call recomputes from
    /// the table.
    pub fn aggregate(&self) -> Result<Option<PredictionStats>> {
        let conn = self.lock_conn()?;
        let (count, avg): (i64, Option<f64>) = conn
            .query_row("SELECT COUNT(*), AVG(prediction) FROM logs", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(|e| Error::Persistence(format!("failed to aggregate predictions: {e}")))?;

        match avg {
            Some(avg) if count > 0 => Ok(Some(PredictionStats {
                total_requests: count as u64,
                average_prediction: (avg * 1000.0).round() / 1000.0,
            })),
            _ => Ok(None),
        }
    }

    /// All records in insertion order
    pub fn records(&self) -> Result<Vec<PredictionRecord>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT timestamp, MedInc, HouseAge, AveRooms, AveBedrms, Population, AveOccup, \
                 Latitude, Longitude, prediction FROM logs ORDER BY rowid",
            )
            .map_err(|e| Error::Persistence(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                let timestamp: String = row.get(0)?;
                let mut values = [0.0f64; 8];
                for (i, value) in values.iter_mut().enumerate() {
                    *value = row.get(i + 1)?;
                }
                let prediction: f64 = row.get(9)?;
                Ok(PredictionRecord {
                    timestamp,
                    input: HousingFeatures::from_array(values),
                    prediction,
                })
            })
            .map_err(|e| Error::Persistence(format!("failed to query predictions: {e}")))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(
                row.map_err(|e| Error::Persistence(format!("failed to read prediction row: {e}")))?,
            );
        }
        Ok(result)
    }
}

/// Initialize pragmas and the `logs` table
fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| Error::Persistence(format!("failed to configure db: {e}")))?;

    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| Error::Persistence(format!("failed to init schema: {e}")))?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS logs (
    timestamp TEXT,
    MedInc REAL, HouseAge REAL, AveRooms REAL, AveBedrms REAL,
    Population REAL, AveOccup REAL, Latitude REAL, Longitude REAL,
    prediction REAL
);
";

// =============================================================================
// Tests
// =============================================================================
