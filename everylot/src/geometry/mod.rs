//! Parcel geometry and map viewport math.
//!
//! Provides WKB decoding of parcel boundaries, bounding-box scaling and the
//! Web Mercator zoom calculation used to frame the static map snapshot.

mod bounds;
mod parcel;
pub mod wkb;
mod zoom;

pub use bounds::{scale_bounds, Bounds};
pub use parcel::{MapViewport, Parcel, VIEWPORT_SCALE};
pub use wkb::WkbError;
pub use zoom::{calculate_zoom, MAX_ZOOM, WORLD_PX};

use thiserror::Error;

/// Errors that can occur while turning a lot's geometry into a map viewport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The lot has no geometry column value.
    #[error("lot has no geometry")]
    Missing,

    /// The stored blob is not valid WKB.
    #[error("invalid geometry: {0}")]
    Wkb(#[from] WkbError),

    /// The geometry is not a polygon or multipolygon.
    #[error("unsupported geometry type: {0}")]
    Unsupported(String),

    /// The geometry has no coordinates.
    #[error("geometry is empty")]
    Empty,
}
