//! # predecir
//!
//! California housing price serving: a linear-regression model trained
//! offline with [`aprender`] is loaded by an axum service exposing
//! prediction, retraining, and metrics endpoints.
//!
//! Every served prediction is appended to a JSONL log and a SQLite `logs`
//! table; retraining merges an uploaded CSV batch with the base dataset,
//! fits a fresh model, persists the `.apr` artifact, and hot-swaps the
//! serving slot.
//!
//! # Example
//!
//! ```no_run
//! use predecir::{HousingFeatures, ModelHandle};
//!
//! # fn main() -> predecir::Result<()> {
//! let model = ModelHandle::load("models/model.apr")?;
//! let price = model.predict(&HousingFeatures::example_berkeley())?;
//! println!("predicted price: {price:.3}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod monitor;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use dataset::HousingDataset;
pub use error::{Error, Result};
pub use features::HousingFeatures;
pub use model::{train_model, EvalReport, ModelHandle, RetrainOutcome};
pub use monitor::ServiceMetrics;
pub use server::AppState;
pub use storage::{PredictionRecord, SqliteStore};
