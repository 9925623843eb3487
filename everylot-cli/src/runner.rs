//! Shared setup for every command: logging and the config file.

use std::path::{Path, PathBuf};

use everylot::config::{config_file_path, ConfigFile};
use everylot::logging::init_logging;
use tracing::{debug, info};

use crate::error::CliError;

/// Common state for a CLI invocation.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Installs logging and loads the configuration file.
    ///
    /// An explicit `config_path` must exist; the default one may be absent.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        init_logging(verbose)?;
        Self::load(config_path)
    }

    /// Loads configuration without touching logging.
    pub fn load(config_path: Option<&Path>) -> Result<Self, CliError> {
        let (config, config_path) = match config_path {
            Some(path) => (ConfigFile::load_from(path)?, path.to_path_buf()),
            None => (ConfigFile::load()?, config_file_path()),
        };
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log the command being run.
    pub fn log_startup(&self, command: &str) {
        info!(command, version = env!("CARGO_PKG_VERSION"), "everylot starting");
        debug!(config = %self.config_path.display(), "Using configuration file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_explicit_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[google]\napi_key = from-file").unwrap();

        let runner = CliRunner::load(Some(file.path())).unwrap();
        assert_eq!(runner.config().google.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CliRunner::load(Some(&dir.path().join("nope.ini")));
        assert!(result.is_err());
    }
}
