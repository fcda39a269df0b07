//! Predecir CLI
//!
//! Entry point for offline training and the prediction service.
//!
//! # Usage
//!
//! ```bash
//! # Train the model from the base dataset
//! predecir train data/raw/housing.csv --output models/model.apr
//!
//! # Serve predictions
//! predecir serve --address 127.0.0.1:8000
//! ```

use clap::Parser;
use predecir::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
