//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration, input or sink error
    #[error(transparent)]
    Contract(#[from] contracts::ContractError),

    /// Input document is not a JSON array of entries
    #[error(transparent)]
    Ingestion(#[from] ingestion::IngestionError),

    /// One or more sinks failed
    #[error(transparent)]
    Dispatch(#[from] dispatcher::DispatcherError),

    /// Nothing survived conversion and `--fail-on-empty` was given
    #[error("no records were produced ({rejected} entries rejected)")]
    NoRecords { rejected: usize },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
