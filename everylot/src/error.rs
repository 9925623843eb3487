//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::format::FormatError;
use crate::geometry::GeometryError;
use crate::locate::LocateError;
use crate::provider::ProviderError;
use crate::store::StoreError;

/// Result type for everylot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Selecting or updating the lot failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The lot's geometry cannot be drawn.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A format string is malformed or refers to a missing field.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The lot cannot be located for Street View.
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// An image request failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
