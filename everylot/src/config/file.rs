//! INI configuration file.
//!
//! ```ini
//! [database]
//! path = /var/lib/everylot/lots.db
//!
//! [google]
//! api_key = YOUR_API_KEY
//! timeout = 30
//!
//! [format]
//! search = {address}, {city} {state}
//! print = {address}
//! ```
//!
//! Every key is optional. `[google]` also accepts `streetview_url`,
//! `geocode_url` and `staticmap_url` to point requests elsewhere.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Errors from reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid value for {section}.{key}: '{value}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

/// `[database]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub path: Option<PathBuf>,
}

/// `[google]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleSettings {
    pub api_key: Option<String>,
    pub timeout: Option<u64>,
    pub streetview_url: Option<String>,
    pub geocode_url: Option<String>,
    pub staticmap_url: Option<String>,
}

/// `[format]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSettings {
    pub search: Option<String>,
    pub print: Option<String>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub database: DatabaseSettings,
    pub google: GoogleSettings,
    pub format: FormatSettings,
}

/// Default location of the configuration file
/// (`~/.config/everylot/config.ini` on Linux).
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("everylot")
        .join("config.ini")
}

impl ConfigFile {
    /// Loads the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse(e.to_string()),
        })?;
        Self::from_ini(&ini)
    }

    /// Loads the default file, or an empty configuration if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let get = |section: &str, key: &str| -> Option<String> {
            ini.section(Some(section))
                .and_then(|props| props.get(key))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let timeout = match get("google", "timeout") {
            Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                section: "google".to_string(),
                key: "timeout".to_string(),
                value,
            })?),
            None => None,
        };

        Ok(Self {
            database: DatabaseSettings {
                path: get("database", "path").map(PathBuf::from),
            },
            google: GoogleSettings {
                api_key: get("google", "api_key"),
                timeout,
                streetview_url: get("google", "streetview_url"),
                geocode_url: get("google", "geocode_url"),
                staticmap_url: get("google", "staticmap_url"),
            },
            format: FormatSettings {
                search: get("format", "search"),
                print: get("format", "print"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_file() {
        let config = ConfigFile::parse(
            "[database]\n\
             path = /data/lots.db\n\
             [google]\n\
             api_key = secret\n\
             timeout = 12\n\
             [format]\n\
             search = {address}, {city}\n\
             print = {address} - every lot\n",
        )
        .unwrap();

        assert_eq!(config.database.path, Some(PathBuf::from("/data/lots.db")));
        assert_eq!(config.google.api_key.as_deref(), Some("secret"));
        assert_eq!(config.google.timeout, Some(12));
        assert_eq!(config.format.search.as_deref(), Some("{address}, {city}"));
        assert_eq!(config.format.print.as_deref(), Some("{address} - every lot"));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = ConfigFile::parse("[google]\napi_key =\n").unwrap();
        assert_eq!(config.google.api_key, None);
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ConfigFile::parse("[google]\ntimeout = soon\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "timeout"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\npath = lots.db").unwrap();

        let config = ConfigFile::load_from(file.path()).unwrap();
        assert_eq!(config.database.path, Some(PathBuf::from("lots.db")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load_from(&dir.path().join("missing.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("everylot/config.ini"));
    }
}
