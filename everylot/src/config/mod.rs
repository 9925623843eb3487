//! Configuration.
//!
//! [`ConfigFile`] is the on-disk INI file; [`EveryLotConfig`] is the resolved
//! configuration a run is started with, after command-line overrides.

mod file;

pub use file::{config_file_path, ConfigError, ConfigFile, DatabaseSettings, FormatSettings, GoogleSettings};

use crate::provider::{Endpoints, DEFAULT_TIMEOUT_SECS};

/// Address format used to look a lot up in Street View.
pub const DEFAULT_SEARCH_FORMAT: &str = "{address}, {city} {state}";

/// Format of the posted status text.
pub const DEFAULT_PRINT_FORMAT: &str = "{address}";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EveryLotConfig {
    /// Google Maps Platform API key.
    pub api_key: String,

    pub search_format: String,

    pub print_format: String,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,

    pub endpoints: Endpoints,
}

impl EveryLotConfig {
    /// Default configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            search_format: DEFAULT_SEARCH_FORMAT.to_string(),
            print_format: DEFAULT_PRINT_FORMAT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
        }
    }

    /// Builds a configuration from a config file, falling back to defaults
    /// for anything the file leaves unset.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let defaults = Endpoints::default();
        Self {
            api_key: file.google.api_key.clone().unwrap_or_default(),
            search_format: file
                .format
                .search
                .clone()
                .unwrap_or_else(|| DEFAULT_SEARCH_FORMAT.to_string()),
            print_format: file
                .format
                .print
                .clone()
                .unwrap_or_else(|| DEFAULT_PRINT_FORMAT.to_string()),
            timeout_secs: file.google.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            endpoints: Endpoints {
                streetview: file
                    .google
                    .streetview_url
                    .clone()
                    .unwrap_or(defaults.streetview),
                geocode: file.google.geocode_url.clone().unwrap_or(defaults.geocode),
                staticmap: file
                    .google
                    .staticmap_url
                    .clone()
                    .unwrap_or(defaults.staticmap),
            },
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the Street View search format.
    pub fn with_search_format(mut self, format: impl Into<String>) -> Self {
        self.search_format = format.into();
        self
    }

    /// Set the status format.
    pub fn with_print_format(mut self, format: impl Into<String>) -> Self {
        self.print_format = format.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the endpoint base URLs.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}
