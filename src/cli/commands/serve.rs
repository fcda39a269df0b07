//! Serve command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ServeArgs, ServerConfig};
use crate::server;
use tracing_subscriber::EnvFilter;

pub fn run_serve(args: ServeArgs, level: LogLevel) -> Result<(), String> {
    init_tracing(level);

    let config = ServerConfig::from(&args);
    log(
        level,
        LogLevel::Normal,
        &format!("Predecir: serving on http://{}", config.address),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Model artifact: {}", config.artifact_path.display()),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Base dataset: {}", config.base_data_path.display()),
    );
    log(level, LogLevel::Verbose, &format!("  Log dir: {}", config.log_dir.display()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Runtime error: {e}"))?;

    runtime.block_on(server::run(config)).map_err(|e| format!("Server error: {e}"))
}

/// Route server logs through tracing; `RUST_LOG` overrides the CLI flags.
fn init_tracing(level: LogLevel) {
    let default_directive = match level {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "info",
        LogLevel::Verbose => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Ignore the error if a subscriber is already installed (e.g. in tests).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
