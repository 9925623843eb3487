//! Logging setup.
//!
//! The library only emits `tracing` events. Binaries call [`init_logging`]
//! once at startup to print them to stderr, filtered by `RUST_LOG` when set.

use thiserror::Error;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "everylot=info";

/// Filter used for verbose output.
pub const VERBOSE_FILTER: &str = "everylot=debug";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("failed to install logger: {0}")]
    Init(String),
}

/// Builds the event filter: `RUST_LOG` wins, then the verbosity flag.
pub fn build_filter(verbose: bool) -> Result<EnvFilter, LoggingError> {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok(), verbose)
}

fn filter_from(directives: Option<String>, verbose: bool) -> Result<EnvFilter, LoggingError> {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };

    let directives = directives
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    EnvFilter::try_new(directives).map_err(|e| LoggingError::Filter(e.to_string()))
}

/// Installs the global subscriber writing to stderr.
pub fn init_logging(verbose: bool) -> Result<(), LoggingError> {
    let filter = build_filter(verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
