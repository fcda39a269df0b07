//! Tabular housing data: CSV parsing, validation, and model-input conversion.
//!
//! The base dataset and retraining uploads both arrive as CSV with a header
//! row. Column order is not significant; columns are resolved by name. The
//! label column is `target` in uploads and `MedHouseVal` in the base
//! dataset, so either name is accepted.

use crate::error::{Error, Result};
use crate::features::{HousingFeatures, BASE_TARGET_COLUMN, FEATURE_COLUMNS, TARGET_COLUMN};
use aprender::primitives::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;

/// Labeled housing rows in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HousingDataset {
    features: Vec<[f64; 8]>,
    targets: Vec<f64>,
}

impl HousingDataset {
    /// Parse CSV text with a header row.
    ///
    /// Requires the eight feature columns plus a label column (`target` or
    /// `MedHouseVal`). Extra columns are ignored. Fails with
    /// [`Error::Validation`] naming the missing column set, or the offending
    /// line for unparseable values.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| Error::Validation("empty CSV: no header row".to_string()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let mut missing: Vec<&str> = Vec::new();
        let mut feature_indices = [0usize; 8];
        for (slot, name) in FEATURE_COLUMNS.into_iter().enumerate() {
            match columns.iter().position(|c| *c == name) {
                Some(idx) => feature_indices[slot] = idx,
                None => missing.push(name),
            }
        }
        let target_index = columns
            .iter()
            .position(|c| *c == TARGET_COLUMN || *c == BASE_TARGET_COLUMN);
        if target_index.is_none() {
            missing.push(TARGET_COLUMN);
        }
        if !missing.is_empty() {
            return Err(Error::Validation(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }
        let target_index = target_index.expect("checked above");

        let mut dataset = Self::default();
        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(Error::Validation(format!(
                    "line {}: expected {} fields, found {}",
                    line_no + 1,
                    columns.len(),
                    fields.len()
                )));
            }

            let parse = |idx: usize| -> Result<f64> {
                fields[idx].parse::<f64>().map_err(|_| {
                    Error::Validation(format!(
                        "line {}: column {} is not numeric: {:?}",
                        line_no + 1,
                        columns[idx],
                        fields[idx]
                    ))
                })
            };

            let mut row = [0.0f64; 8];
            for (slot, idx) in feature_indices.iter().enumerate() {
                row[slot] = parse(*idx)?;
            }
            dataset.push(row, parse(target_index)?);
        }

        Ok(dataset)
    }

    /// Load and parse a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Persistence(format!("failed to read dataset {}: {e}", path.display()))
        })?;
        Self::from_csv_str(&content)
    }

    /// Append one labeled row
    pub fn push(&mut self, features: [f64; 8], target: f64) {
        self.features.push(features);
        self.targets.push(target);
    }

    /// Base-first, order-preserving union of two datasets
    pub fn concat(base: &Self, upload: &Self) -> Self {
        let mut combined = base.clone();
        combined.features.extend_from_slice(&upload.features);
        combined.targets.extend_from_slice(&upload.targets);
        combined
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature row by index
    pub fn row(&self, index: usize) -> HousingFeatures {
        HousingFeatures::from_array(self.features[index])
    }

    /// Label by index
    pub fn target(&self, index: usize) -> f64 {
        self.targets[index]
    }

    /// Deterministic shuffled split into (train, test)
    pub fn split(&self, test_fraction: f64, seed: u64) -> (Self, Self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let test_rows = ((self.len() as f64) * test_fraction).round() as usize;
        let (test_idx, train_idx) = order.split_at(test_rows.min(self.len()));

        let collect = |indices: &[usize]| {
            let mut subset = Self::default();
            for &i in indices {
                subset.push(self.features[i], self.targets[i]);
            }
            subset
        };
        (collect(train_idx), collect(test_idx))
    }

    /// Feature matrix (n × 8) for model input
    pub fn to_matrix(&self) -> Result<Matrix<f32>> {
        let flat: Vec<f32> = self.features.iter().flatten().map(|v| *v as f32).collect();
        Matrix::from_vec(self.len(), FEATURE_COLUMNS.len(), flat)
            .map_err(|e| Error::Training(format!("feature matrix: {e}")))
    }

    /// Label vector aligned with [`Self::to_matrix`]
    pub fn to_target_vector(&self) -> Vector<f32> {
        let values: Vec<f32> = self.targets.iter().map(|v| *v as f32).collect();
        Vector::from_slice(&values)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const UPLOAD_CSV: &str = "\
MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude,target
8.3,41,6.98,1.02,322,2.55,37.88,-122.23,4.526
8.3,21,6.24,0.97,2401,2.11,37.86,-122.22,3.585
";

    #[test]
    fn test_parse_upload_csv() {
        let dataset = HousingDataset::from_csv_str(UPLOAD_CSV).expect("operation should succeed");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.row(0), crate::features::HousingFeatures::example_berkeley());
        assert!((dataset.target(1) - 3.585).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_base_csv_label_name() {
        let csv = UPLOAD_CSV.replace("target", "MedHouseVal");
        let dataset = HousingDataset::from_csv_str(&csv).expect("operation should succeed");
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_column_order_is_not_significant() {
        let csv = "\
target,Longitude,Latitude,AveOccup,Population,AveBedrms,AveRooms,HouseAge,MedInc
4.526,-122.23,37.88,2.55,322,1.02,6.98,41,8.3
";
        let dataset = HousingDataset::from_csv_str(csv).expect("operation should succeed");
        assert_eq!(dataset.row(0), crate::features::HousingFeatures::example_berkeley());
        assert!((dataset.target(0) - 4.526).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_target_column() {
        let csv = "\
MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude
8.3,41,6.98,1.02,322,2.55,37.88,-122.23
";
        let err = HousingDataset::from_csv_str(csv).expect_err("must reject");
        assert_eq!(err.to_string(), "validation error: missing required columns: target");
    }

    #[test]
    fn test_missing_columns_reports_full_set() {
        let csv = "MedInc,HouseAge\n8.3,41\n";
        let err = HousingDataset::from_csv_str(csv).expect_err("must reject");
        let message = err.to_string();
        for column in ["AveRooms", "AveBedrms", "Population", "AveOccup", "Latitude", "Longitude"] {
            assert!(message.contains(column), "expected {column} in {message}");
        }
        assert!(message.contains("target"));
    }

    #[test]
    fn test_non_numeric_value_names_line_and_column() {
        let csv = "\
MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude,target
8.3,old,6.98,1.02,322,2.55,37.88,-122.23,4.526
";
        let err = HousingDataset::from_csv_str(csv).expect_err("must reject");
        let message = err.to_string();
        assert!(message.contains("line 2"), "got {message}");
        assert!(message.contains("HouseAge"), "got {message}");
    }

    #[test]
    fn test_ragged_row_rejected() {
        let csv = "\
MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude,target
8.3,41,6.98
";
        let err = HousingDataset::from_csv_str(csv).expect_err("must reject");
        assert!(err.to_string().contains("expected 9 fields"));
    }

    #[test]
    fn test_empty_csv_rejected() {
        assert!(HousingDataset::from_csv_str("").is_err());
    }

    #[test]
    fn test_concat_keeps_base_first() {
        let base = HousingDataset::from_csv_str(UPLOAD_CSV).expect("operation should succeed");
        let mut upload = HousingDataset::default();
        upload.push([1.0; 8], 9.9);

        let combined = HousingDataset::concat(&base, &upload);
        assert_eq!(combined.len(), 3);
        assert_eq!(combined.row(0), base.row(0));
        assert!((combined.target(2) - 9.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_split_is_deterministic() {
        let mut dataset = HousingDataset::default();
        for i in 0..50 {
            dataset.push([i as f64; 8], i as f64);
        }

        let (train_a, test_a) = dataset.split(0.2, 42);
        let (train_b, test_b) = dataset.split(0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 10);
        assert_eq!(train_a.len(), 40);
    }

    #[test]
    fn test_to_matrix_and_targets_align() {
        let dataset = HousingDataset::from_csv_str(UPLOAD_CSV).expect("operation should succeed");
        assert!(dataset.to_matrix().is_ok());
        assert_eq!(dataset.to_target_vector().as_slice().len(), dataset.len());
    }
}

// =============================================================================
// Property Tests
// =============================================================================
