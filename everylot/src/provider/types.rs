//! Shared provider types.

use thiserror::Error;

/// Errors from talking to an imaging or geocoding endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// A point returned by a geocoder.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Why a geocoding request produced no usable location.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeocodeError {
    /// The request never got an answer.
    #[error("geocode request failed: {0}")]
    Request(ProviderError),

    /// The geocoder answered with a non-200 status.
    #[error("bad response from geocoder: {0}")]
    BadStatus(u16),

    /// The body was not the expected JSON or had no results.
    #[error("could not read geocoder response: {0}")]
    Parse(String),
}

/// Turns a postal address into coordinates.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<LatLng, GeocodeError>;
}
