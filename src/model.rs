//! Model handle: the process-wide current regression model.
//!
//! One hot-swappable slot holds the serving model. Predictions share a read
//! lock; a retrain fits a fresh model, persists the artifact, and only then
//! commits the swap under the write lock, so the prior model serves every
//! in-flight request until the new one is fully installed.

use crate::dataset::HousingDataset;
use crate::error::{Error, Result};
use crate::features::HousingFeatures;
use aprender::format::{load, save, ModelType, SaveOptions};
use aprender::linear_model::LinearRegression;
use aprender::metrics::{r_squared, rmse};
use aprender::traits::Estimator;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Held-out evaluation of a freshly trained model
#[derive(Debug, Clone, Copy)]
pub struct EvalReport {
    /// Root mean squared error on the held-out split
    pub rmse: f32,
    /// Coefficient of determination on the held-out split
    pub r_squared: f32,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Row accounting for a completed retrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrainOutcome {
    /// Rows in the combined base + upload dataset
    pub total_rows: usize,
    /// Rows contributed by the upload
    pub new_rows: usize,
}

/// Fit a fresh model on a train split and evaluate it on the held-out rows.
///
/// Tiny datasets may round to an empty test split; evaluation then falls
/// back to the training rows.
pub fn train_model(
    dataset: &HousingDataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(LinearRegression, EvalReport)> {
    if dataset.is_empty() {
        return Err(Error::Validation("cannot train on an empty dataset".to_string()));
    }

    let (train, test) = dataset.split(test_fraction, seed);
    let (train, test) = if train.is_empty() { (test, train) } else { (train, test) };

    let model = fit_full(&train)?;

    let eval_set = if test.is_empty() { &train } else { &test };
    let predictions = model.predict(&eval_set.to_matrix()?);
    let truth = eval_set.to_target_vector();

    let report = EvalReport {
        rmse: rmse(&predictions, &truth),
        r_squared: r_squared(&predictions, &truth),
        train_rows: train.len(),
        test_rows: test.len(),
    };
    Ok((model, report))
}

/// Fit a fresh model on every row of the dataset
pub fn fit_full(dataset: &HousingDataset) -> Result<LinearRegression> {
    if dataset.is_empty() {
        return Err(Error::Validation("cannot train on an empty dataset".to_string()));
    }

    let x = dataset.to_matrix()?;
    let y = dataset.to_target_vector();

    let mut model = LinearRegression::new();
    model.fit(&x, &y).map_err(|e| Error::Training(format!("linear regression fit: {e}")))?;
    Ok(model)
}

/// Persist a model to its `.apr` artifact, overwriting any previous one
pub fn save_artifact(model: &LinearRegression, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    save(model, ModelType::LinearRegression, path, SaveOptions::default())
        .map_err(|e| Error::Serialization(format!("APR save error: {e}")))
}

/// Load a model from its `.apr` artifact
pub fn load_artifact(path: &Path) -> Result<LinearRegression> {
    load(path, ModelType::LinearRegression)
        .map_err(|e| Error::Serialization(format!("APR load error: {e}")))
}

/// The process-wide mutable reference to "the current model"
pub struct ModelHandle {
    slot: RwLock<Option<LinearRegression>>,
    artifact_path: PathBuf,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("artifact_path", &self.artifact_path)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl ModelHandle {
    /// Handle with an empty slot; predictions fail until a model is installed
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self { slot: RwLock::new(None), artifact_path: artifact_path.into() }
    }

    /// Handle initialized from an existing artifact
    pub fn load(artifact_path: impl Into<PathBuf>) -> Result<Self> {
        let artifact_path = artifact_path.into();
        let model = load_artifact(&artifact_path)?;
        Ok(Self { slot: RwLock::new(Some(model)), artifact_path })
    }

    /// Handle from an artifact location that may not exist yet.
    ///
    /// A missing artifact leaves the slot empty so the service can start and
    /// report [`Error::ModelUnavailable`] until a retrain installs one.
    pub fn open(artifact_path: impl Into<PathBuf>) -> Result<Self> {
        let artifact_path = artifact_path.into();
        if artifact_path.exists() {
            Self::load(artifact_path)
        } else {
            Ok(Self::new(artifact_path))
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Predict the median house value for one feature vector
    pub fn predict(&self, features: &HousingFeatures) -> Result<f64> {
        let row: Vec<f32> = features.to_array().iter().map(|v| *v as f32).collect();
        let x = aprender::primitives::Matrix::from_vec(1, row.len(), row)
            .map_err(|e| Error::Training(format!("probe matrix: {e}")))?;

        let slot = self
            .slot
            .read()
            .map_err(|e| Error::Persistence(format!("failed to acquire model read lock: {e}")))?;
        let model = slot.as_ref().ok_or(Error::ModelUnavailable)?;

        Ok(f64::from(model.predict(&x).as_slice()[0]))
    }

    /// Fit a fresh model on the combined dataset, persist it, and swap it in.
    ///
    /// The swap happens only after both fit and persist succeed; on any
    /// failure the prior model stays in effect.
    pub fn retrain(&self, combined: &HousingDataset, new_rows: usize) -> Result<RetrainOutcome> {
        let model = fit_full(combined)?;
        save_artifact(&model, &self.artifact_path)?;

        let mut slot = self
            .slot
            .write()
            .map_err(|e| Error::Persistence(format!("failed to acquire model write lock: {e}")))?;
        *slot = Some(model);

        Ok(RetrainOutcome { total_rows: combined.len(), new_rows })
    }
}

// =============================================================================
// Tests
// =============================================================================
