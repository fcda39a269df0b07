//! Train command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::TrainArgs;
use crate::dataset::HousingDataset;
use crate::model::{save_artifact, train_model};

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Predecir: training from {}", args.data.display()),
    );

    let dataset =
        HousingDataset::from_csv_path(&args.data).map_err(|e| format!("Dataset error: {e}"))?;
    log(level, LogLevel::Verbose, &format!("  Loaded {} rows", dataset.len()));

    let (model, report) = train_model(&dataset, args.test_split, args.seed)
        .map_err(|e| format!("Training error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("  RMSE: {:.3}  R²: {:.3}", report.rmse, report.r_squared),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Split: {} train / {} test rows", report.train_rows, report.test_rows),
    );

    save_artifact(&model, &args.output).map_err(|e| format!("Save error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("✓ Model saved to {}", args.output.display()),
    );
    Ok(())
}
