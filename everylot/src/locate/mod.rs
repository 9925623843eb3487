//! Choosing the location string for a Street View request.
//!
//! Street View accepts either a postal address or `lat,lon`. Addresses
//! usually produce a better framed photo, but a geocoder can place an address
//! in the wrong city or country. When the lot has coordinates, the address is
//! only used if the geocoder puts it within [`COMFORT_ZONE_DEGREES`] of them.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::format::{FormatError, Template};
use crate::geometry::Bounds;
use crate::lot::{format_coordinate, Lot};
use crate::provider::{GeocodeError, Geocoder, LatLng};

/// Half-width of the accepted box around the lot, in degrees (about 750 m).
pub const COMFORT_ZONE_DEGREES: f64 = 0.007;

/// Errors from resolving a location.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The lot has neither a usable address nor coordinates.
    #[error("lot {lot_id} has no address ({reason}) and no coordinates")]
    NoLocation { lot_id: i64, reason: FormatError },
}

/// Outcome of checking a geocoded address against the lot's coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeCheck {
    /// The geocoder agrees with the lot's coordinates.
    Confirmed,
    /// The request did not complete.
    RequestFailed(String),
    /// The geocoder answered with a non-200 status.
    BadStatus(u16),
    /// The answer could not be read.
    ParseError(String),
    /// The geocoder placed the address outside the comfort zone.
    OutOfBounds(LatLng),
}

impl GeocodeCheck {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, GeocodeCheck::Confirmed)
    }
}

impl From<GeocodeError> for GeocodeCheck {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::Request(e) => GeocodeCheck::RequestFailed(e.to_string()),
            GeocodeError::BadStatus(status) => GeocodeCheck::BadStatus(status),
            GeocodeError::Parse(msg) => GeocodeCheck::ParseError(msg),
        }
    }
}

impl fmt::Display for GeocodeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeCheck::Confirmed => write!(f, "geocoded address is near the lot"),
            GeocodeCheck::RequestFailed(msg) => write!(f, "geocode request failed: {}", msg),
            GeocodeCheck::BadStatus(status) => {
                write!(f, "bad response from geocoder: {}", status)
            }
            GeocodeCheck::ParseError(msg) => write!(f, "unreadable geocoder response: {}", msg),
            GeocodeCheck::OutOfBounds(loc) => write!(
                f,
                "geocoder puts the address at {},{}, outside the comfort zone",
                loc.lat, loc.lng
            ),
        }
    }
}

/// Geocodes `address` and checks the result lies in `zone`.
pub fn check_geocode<G: Geocoder + ?Sized>(geocoder: &G, address: &str, zone: &Bounds) -> GeocodeCheck {
    match geocoder.geocode(address) {
        Ok(loc) if zone.contains(loc.lat, loc.lng) => GeocodeCheck::Confirmed,
        Ok(loc) => GeocodeCheck::OutOfBounds(loc),
        Err(e) => e.into(),
    }
}

/// `lat,lon` string for a Street View request.
pub fn coordinate_location(lat: f64, lon: f64) -> String {
    format!("{},{}", format_coordinate(lat), format_coordinate(lon))
}

/// Picks the Street View location for `lot`.
///
/// Uses the address rendered with `search_format` when it can be trusted,
/// otherwise the lot's coordinates. Geocoding problems never fail the call.
pub fn streetviewable_location<G: Geocoder + ?Sized>(
    lot: &Lot,
    search_format: &Template,
    geocoder: &G,
) -> Result<String, LocateError> {
    let address = match search_format.render(lot) {
        Ok(address) => address,
        Err(reason) => {
            warn!(lot_id = lot.id, %reason, "Could not find street address, using lat/lon");
            return lot
                .coordinates()
                .map(|(lat, lon)| coordinate_location(lat, lon))
                .ok_or(LocateError::NoLocation {
                    lot_id: lot.id,
                    reason,
                });
        }
    };

    let Some((lat, lon)) = lot.coordinates() else {
        info!(lot_id = lot.id, "No lat/lon coordinates. Using address naively.");
        return Ok(address);
    };

    let zone = Bounds::around(lat, lon, COMFORT_ZONE_DEGREES);
    let check = check_geocode(geocoder, &address, &zone);

    if check.is_confirmed() {
        debug!(lot_id = lot.id, "Using database address for Street View");
        Ok(address)
    } else {
        info!(lot_id = lot.id, reason = %check, lat, lon, "Locating with database coordinates");
        Ok(coordinate_location(lat, lon))
    }
}
