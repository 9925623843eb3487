//! CLI error type.

use std::io;
use std::path::PathBuf;

use everylot::config::ConfigError;
use everylot::logging::LoggingError;
use everylot::provider::ProviderError;
use everylot::store::StoreError;
use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or conflicting settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A run failed inside the library.
    #[error(transparent)]
    Everylot(#[from] everylot::Error),

    /// Writing the image failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Logging(#[from] LoggingError),
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Everylot(e.into())
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Everylot(e.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Everylot(e.into())
    }
}
