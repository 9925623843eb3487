//! Zoom level that fits a bounding box into a map image.
//!
//! Web Mercator maps at zoom `z` are `256 * 2^z` pixels wide, so the zoom
//! that fits a box is `log2(map_px / 256 / fraction)` where `fraction` is the
//! share of the world the box covers along that axis. Latitude is measured in
//! projected units, longitude linearly.

use std::f64::consts::PI;

use super::bounds::Bounds;

/// World size in pixels at zoom 0.
pub const WORLD_PX: f64 = 256.0;

/// Highest zoom the static map endpoint serves.
pub const MAX_ZOOM: u8 = 20;

/// Half the Mercator-projected latitude, clamped to the projection's range.
fn lat_rad(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let rad_x2 = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    rad_x2.clamp(-PI, PI) / 2.0
}

fn axis_zoom(map_px: u32, fraction: f64) -> f64 {
    (map_px as f64 / WORLD_PX / fraction).log2().floor()
}

/// Returns the highest zoom (at most [`MAX_ZOOM`]) at which `bounds` fits
/// into a map of `map_dim = (width, height)` pixels.
///
/// An axis with zero extent places no limit on the zoom.
pub fn calculate_zoom(bounds: &Bounds, map_dim: (u32, u32)) -> u8 {
    let lat_fraction = (lat_rad(bounds.max_lat) - lat_rad(bounds.min_lat)) / PI;

    let lng_diff = bounds.max_lng - bounds.min_lng;
    let lng_span = if lng_diff < 0.0 {
        lng_diff + 360.0
    } else {
        lng_diff
    };
    let lng_fraction = lng_span / 360.0;

    let lat_zoom = axis_zoom(map_dim.1, lat_fraction);
    let lng_zoom = axis_zoom(map_dim.0, lng_fraction);

    let zoom = lat_zoom.min(lng_zoom).min(MAX_ZOOM as f64);
    // A box wider than the map at zoom 0 still gets the whole world.
    zoom.max(0.0) as u8
}
