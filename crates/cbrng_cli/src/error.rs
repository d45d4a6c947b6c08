//! CLI error types.

use cbrng_core::CbrngError;
use cbrng_engine::ConfigError;
use thiserror::Error;

/// Errors surfaced by `cbrng` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generator construction failed.
    #[error("Generator error: {0}")]
    Cbrng(#[from] CbrngError),

    /// Engine configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A command-line value could not be used.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed.
    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more backends disagreed with the reference.
    #[error("Conformance check failed with {0} mismatches")]
    ConformanceFailed(usize),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
