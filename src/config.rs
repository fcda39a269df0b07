//! CLI argument parsing and server configuration.
//!
//! # Usage
//!
//! ```bash
//! predecir train data/raw/housing.csv --output models/model.apr
//! predecir serve --address 127.0.0.1:8000 --log-dir logs
//! ```

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Predecir: California housing price serving
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "predecir")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Serve a housing price regression model: predict, retrain, and metrics over HTTP")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train the regression model offline from a CSV dataset
    Train(TrainArgs),

    /// Run the prediction service
    Serve(ServeArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to the labeled housing CSV
    #[arg(value_name = "DATA", default_value = "data/raw/housing.csv")]
    pub data: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, default_value = "models/model.apr")]
    pub output: PathBuf,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_split: f64,

    /// Random seed for the train/test shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Arguments for the serve command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    pub address: SocketAddr,

    /// Model artifact location (loaded at startup, overwritten on retrain)
    #[arg(short, long, default_value = "models/model.apr")]
    pub model: PathBuf,

    /// Base dataset merged with every retraining upload
    #[arg(short, long, default_value = "data/raw/housing.csv")]
    pub data: PathBuf,

    /// Directory for the prediction and retraining logs
    #[arg(short, long, default_value = "logs")]
    pub log_dir: PathBuf,
}

/// Parse CLI arguments from an iterator (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Server address
    pub address: SocketAddr,
    /// Model artifact location
    pub artifact_path: PathBuf,
    /// Base dataset for retraining
    pub base_data_path: PathBuf,
    /// Directory holding prediction and audit logs
    pub log_dir: PathBuf,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8000".parse().unwrap(),
            artifact_path: PathBuf::from("models/model.apr"),
            base_data_path: PathBuf::from("data/raw/housing.csv"),
            log_dir: PathBuf::from("logs"),
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl ServerConfig {
    /// Create config with custom address
    pub fn with_address(mut self, addr: SocketAddr) -> Self {
        self.address = addr;
        self
    }

    /// Create config with a custom artifact location
    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    /// Create config with a custom base dataset
    pub fn with_base_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_data_path = path.into();
        self
    }

    /// Create config with a custom log directory
    pub fn with_log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_dir = path.into();
        self
    }

    /// JSONL prediction log location
    pub fn prediction_log_path(&self) -> PathBuf {
        self.log_dir.join("predictions.jsonl")
    }

    /// SQLite prediction store location
    pub fn store_path(&self) -> PathBuf {
        self.log_dir.join("predictions.db")
    }

    /// Retraining audit log location
    pub fn audit_log_path(&self) -> PathBuf {
        self.log_dir.join("retraining.log")
    }
}

impl From<&ServeArgs> for ServerConfig {
    fn from(args: &ServeArgs) -> Self {
        Self::default()
            .with_address(args.address)
            .with_artifact_path(&args.model)
            .with_base_data_path(&args.data)
            .with_log_dir(&args.log_dir)
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Property Tests
// =============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_server_config_port_preserved(port in 1024u16..65535) {
            let addr: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
            let config = ServerConfig::default().with_address(addr);
            prop_assert_eq!(config.address.port(), port);
        }

        #[test]
        fn prop_log_paths_stay_inside_log_dir(dir in "[a-z]{1,12}") {
            let config = ServerConfig::default().with_log_dir(&dir);
            prop_assert!(config.store_path().starts_with(&dir));
            prop_assert!(config.prediction_log_path().starts_with(&dir));
            prop_assert!(config.audit_log_path().starts_with(&dir));
        }
    }
}
