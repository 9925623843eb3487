//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::ValueEnum;
use everylot::config::{ConfigFile, EveryLotConfig};
use everylot::ImageSource;

use crate::error::CliError;

/// Image kind selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ImageKind {
    /// Street View photo of the building
    Streetview,
    /// Roadmap with the parcel outlined
    Map,
}

impl From<ImageKind> for ImageSource {
    fn from(kind: ImageKind) -> Self {
        match kind {
            ImageKind::Streetview => ImageSource::StreetView,
            ImageKind::Map => ImageSource::Map,
        }
    }
}

/// Resolve the lots database from CLI args and config.
pub fn resolve_database(cli_path: Option<PathBuf>, config: &ConfigFile) -> Result<PathBuf, CliError> {
    cli_path
        .or_else(|| config.database.path.clone())
        .ok_or_else(|| {
            CliError::Config(
                "No lots database given. Set path in the [database] section of \
                 config.ini or use --database"
                    .to_string(),
            )
        })
}

/// Command-line overrides for a run.
#[derive(Debug, Default, Clone)]
pub struct RunOverrides {
    pub api_key: Option<String>,
    pub search_format: Option<String>,
    pub print_format: Option<String>,
}

/// Resolve run settings. CLI takes precedence, then config, then defaults.
pub fn resolve_run_config(overrides: RunOverrides, config: &ConfigFile) -> Result<EveryLotConfig, CliError> {
    let mut resolved = EveryLotConfig::from_config_file(config);

    if let Some(key) = overrides.api_key {
        resolved = resolved.with_api_key(key);
    }
    if let Some(format) = overrides.search_format {
        resolved = resolved.with_search_format(format);
    }
    if let Some(format) = overrides.print_format {
        resolved = resolved.with_print_format(format);
    }

    if resolved.api_key.trim().is_empty() {
        return Err(CliError::Config(
            "Google Maps requires an API key. \
             Set api_key in the [google] section of config.ini or use --google-api-key"
                .to_string(),
        ));
    }

    Ok(resolved)
}
