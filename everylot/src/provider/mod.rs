//! Imaging and geocoding provider abstraction
//!
//! This module provides the HTTP client seam and the Google Maps Platform
//! client used to geocode addresses and download Street View photos and
//! static map snapshots.
//!
//! ```ignore
//! use everylot::provider::{GoogleMapsClient, ReqwestClient};
//!
//! let http_client = ReqwestClient::with_timeout(30)?;
//! let client = GoogleMapsClient::new(http_client, api_key);
//! let location = client.geocode("1 Main St, Springfield IL")?;
//! ```

mod google;
mod http;
mod types;

pub use google::{
    format_latlng, Endpoints, GoogleMapsClient, GEOCODE_URL, IMAGE_SIZE, STATICMAP_URL,
    STREETVIEW_URL,
};
pub use http::{HttpClient, HttpResponse, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{GeocodeError, Geocoder, LatLng, ProviderError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
