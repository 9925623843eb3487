//! Google Maps Platform client.
//!
//! Wraps the three web services a run may call:
//!
//! - Street View Static API: `https://maps.googleapis.com/maps/api/streetview`
//! - Geocoding API: `https://maps.googleapis.com/maps/api/geocode/json`
//! - Maps Static API: `https://maps.googleapis.com/maps/api/staticmap`
//!
//! All three authenticate with the same API key, passed as the `key` query
//! parameter. Images are returned fully buffered in memory.

use std::io::Cursor;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::camera::CameraAim;
use crate::geometry::MapViewport;
use crate::provider::{GeocodeError, Geocoder, HttpClient, LatLng, ProviderError};

/// Street View Static API endpoint.
pub const STREETVIEW_URL: &str = "https://maps.googleapis.com/maps/api/streetview";

/// Geocoding API endpoint.
pub const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Maps Static API endpoint.
pub const STATICMAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Width and height of every requested image, in pixels.
pub const IMAGE_SIZE: u32 = 1000;

/// Endpoint base URLs, overridable for proxies and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub streetview: String,
    pub geocode: String,
    pub staticmap: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            streetview: STREETVIEW_URL.to_string(),
            geocode: GEOCODE_URL.to_string(),
            staticmap: STATICMAP_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

/// Google Maps Platform client.
///
/// # Example
///
/// ```no_run
/// use everylot::camera::aim_camera;
/// use everylot::provider::{GoogleMapsClient, ReqwestClient};
///
/// let client = GoogleMapsClient::new(ReqwestClient::new()?, "YOUR_API_KEY");
/// let image = client.get_streetview_image("1 Main St, Springfield IL", aim_camera(Some(3.0)))?;
/// # Ok::<(), everylot::provider::ProviderError>(())
/// ```
pub struct GoogleMapsClient<C: HttpClient> {
    http_client: C,
    api_key: String,
    endpoints: Endpoints,
}

impl<C: HttpClient> GoogleMapsClient<C> {
    /// Creates a client for the public Google endpoints.
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            endpoints: Endpoints::default(),
        }
    }

    /// Replaces the endpoint base URLs.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn http_client(&self) -> &C {
        &self.http_client
    }

    fn build_url(&self, base: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
        let pairs = params
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(std::iter::once(("key", self.api_key.as_str())));
        Url::parse_with_params(base, pairs)
            .map(String::from)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base, e)))
    }

    /// Builds the Street View request for `location` framed by `aim`.
    pub fn streetview_url(&self, location: &str, aim: CameraAim) -> Result<String, ProviderError> {
        self.build_url(
            &self.endpoints.streetview,
            &[
                ("location", location.to_string()),
                ("size", format!("{}x{}", IMAGE_SIZE, IMAGE_SIZE)),
                ("fov", aim.fov.to_string()),
                ("pitch", aim.pitch.to_string()),
            ],
        )
    }

    /// Fetches a Street View photo.
    ///
    /// The response status is not checked: whatever body the endpoint sends
    /// back, including error placeholders, is returned.
    pub fn get_streetview_image(
        &self,
        location: &str,
        aim: CameraAim,
    ) -> Result<Cursor<Vec<u8>>, ProviderError> {
        let url = self.streetview_url(location, aim)?;
        debug!(%location, fov = aim.fov, pitch = aim.pitch, "Requesting Street View image");

        let response = self.http_client.get(&url)?;
        if !response.is_success() {
            warn!(
                status = response.status,
                "Street View returned a non-success status; passing the body through"
            );
        }
        Ok(Cursor::new(response.body))
    }

    /// Builds the Geocoding request for `address`.
    pub fn geocode_url(&self, address: &str) -> Result<String, ProviderError> {
        self.build_url(&self.endpoints.geocode, &[("address", address.to_string())])
    }

    /// Builds the static map request for `viewport`.
    pub fn static_map_url(&self, viewport: &MapViewport) -> Result<String, ProviderError> {
        let mut params = vec![
            ("size", format!("{}x{}", IMAGE_SIZE, IMAGE_SIZE)),
            (
                "center",
                format_latlng(viewport.center.y(), viewport.center.x()),
            ),
        ];
        params.extend(viewport.paths.iter().map(|points| {
            let path = points
                .iter()
                .map(|&(lat, lng)| format_latlng(lat, lng))
                .collect::<Vec<_>>()
                .join("|");
            ("path", path)
        }));
        params.push(("maptype", "roadmap".to_string()));
        params.push(("zoom", viewport.zoom.to_string()));

        self.build_url(&self.endpoints.staticmap, &params)
    }

    /// Fetches a roadmap snapshot of `viewport`.
    pub fn get_static_map(&self, viewport: &MapViewport) -> Result<Cursor<Vec<u8>>, ProviderError> {
        let url = self.static_map_url(viewport)?;
        debug!(
            zoom = viewport.zoom,
            paths = viewport.paths.len(),
            "Requesting static map"
        );

        let response = self.http_client.get(&url)?;
        if !response.is_success() {
            warn!(
                status = response.status,
                "Static Maps returned a non-success status; passing the body through"
            );
        }
        Ok(Cursor::new(response.body))
    }
}

impl<C: HttpClient> Geocoder for GoogleMapsClient<C> {
    fn geocode(&self, address: &str) -> Result<LatLng, GeocodeError> {
        let url = self.geocode_url(address).map_err(GeocodeError::Request)?;
        debug!("Geocoding address with Google");

        let response = self.http_client.get(&url).map_err(GeocodeError::Request)?;
        if response.status != 200 {
            return Err(GeocodeError::BadStatus(response.status));
        }

        let parsed: GeocodeResponse =
            serde_json::from_slice(&response.body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

        match parsed.results.into_iter().next() {
            Some(result) => Ok(result.geometry.location),
            None => Err(GeocodeError::Parse(format!(
                "no results (status {})",
                parsed.status.as_deref().unwrap_or("missing")
            ))),
        }
    }
}

/// Formats a coordinate pair the way the Maps APIs expect: up to eight
/// decimals, trailing zeros removed.
pub fn format_latlng(lat: f64, lng: f64) -> String {
    format!("{},{}", format_float(lat), format_float(lng))
}

fn format_float(value: f64) -> String {
    let text = format!("{:.8}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{HttpResponse, MockHttpClient};
    use geo::Point;
    use std::io::Read;

    fn client(responses: Vec<Result<HttpResponse, ProviderError>>) -> GoogleMapsClient<MockHttpClient> {
        GoogleMapsClient::new(MockHttpClient::new(responses), "test_key")
    }

    fn query(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn param(url: &str, name: &str) -> Option<String> {
        query(url).into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn geocode_body(lat: f64, lng: f64) -> Vec<u8> {
        format!(
            r#"{{"results":[{{"geometry":{{"location":{{"lat":{},"lng":{}}}}}}}],"status":"OK"}}"#,
            lat, lng
        )
        .into_bytes()
    }

    #[test]
    fn test_streetview_url_parameters() {
        let client = client(Vec::new());
        let url = client
            .streetview_url("1 Main St, Springfield IL", CameraAim { fov: 72, pitch: 10 })
            .unwrap();

        assert!(url.starts_with(STREETVIEW_URL));
        assert_eq!(param(&url, "location").as_deref(), Some("1 Main St, Springfield IL"));
        assert_eq!(param(&url, "size").as_deref(), Some("1000x1000"));
        assert_eq!(param(&url, "fov").as_deref(), Some("72"));
        assert_eq!(param(&url, "pitch").as_deref(), Some("10"));
        assert_eq!(param(&url, "key").as_deref(), Some("test_key"));
    }

    #[test]
    fn test_streetview_image_is_buffered_at_start() {
        let client = client(vec![Ok(HttpResponse::ok(vec![0xFF, 0xD8, 0xFF]))]);
        let mut image = client
            .get_streetview_image("40.0,-73.0", CameraAim { fov: 65, pitch: 10 })
            .unwrap();

        assert_eq!(image.position(), 0);
        let mut bytes = Vec::new();
        image.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_streetview_passes_error_bodies_through() {
        let client = client(vec![Ok(HttpResponse {
            status: 403,
            body: b"denied".to_vec(),
        })]);
        let image = client
            .get_streetview_image("40.0,-73.0", CameraAim { fov: 65, pitch: 10 })
            .unwrap();
        assert_eq!(image.into_inner(), b"denied".to_vec());
    }

    #[test]
    fn test_streetview_transport_error_propagates() {
        let client = client(vec![Err(ProviderError::HttpError("timeout".to_string()))]);
        let result = client.get_streetview_image("40.0,-73.0", CameraAim { fov: 65, pitch: 10 });
        assert_eq!(result.unwrap_err(), ProviderError::HttpError("timeout".to_string()));
    }

    #[test]
    fn test_geocode_success() {
        let client = client(vec![Ok(HttpResponse::ok(geocode_body(40.001, -73.002)))]);
        let location = client.geocode("1 Main St").unwrap();
        assert_eq!(location, LatLng { lat: 40.001, lng: -73.002 });

        let requested = client.http_client.requests();
        assert_eq!(param(&requested[0], "address").as_deref(), Some("1 Main St"));
        assert!(requested[0].starts_with(GEOCODE_URL));
    }

    #[test]
    fn test_geocode_bad_status() {
        let client = client(vec![Ok(HttpResponse {
            status: 500,
            body: Vec::new(),
        })]);
        assert_eq!(client.geocode("1 Main St"), Err(GeocodeError::BadStatus(500)));
    }

    #[test]
    fn test_geocode_zero_results() {
        let body = br#"{"results":[],"status":"ZERO_RESULTS"}"#.to_vec();
        let client = client(vec![Ok(HttpResponse::ok(body))]);
        match client.geocode("nowhere") {
            Err(GeocodeError::Parse(msg)) => assert!(msg.contains("ZERO_RESULTS")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_geocode_garbage_body() {
        let client = client(vec![Ok(HttpResponse::ok(b"<html>".to_vec()))]);
        assert!(matches!(client.geocode("1 Main St"), Err(GeocodeError::Parse(_))));
    }

    #[test]
    fn test_geocode_request_error() {
        let client = client(vec![Err(ProviderError::HttpError("refused".to_string()))]);
        assert!(matches!(client.geocode("1 Main St"), Err(GeocodeError::Request(_))));
    }

    fn viewport() -> MapViewport {
        MapViewport {
            center: Point::new(-73.9855, 40.7485),
            zoom: 19,
            paths: vec![
                vec![(40.748, -73.986), (40.748, -73.985), (40.749, -73.985)],
                vec![(40.75, -73.98), (40.75, -73.97)],
            ],
        }
    }

    #[test]
    fn test_static_map_url_parameters() {
        let client = client(Vec::new());
        let url = client.static_map_url(&viewport()).unwrap();
        let pairs = query(&url);

        assert!(url.starts_with(STATICMAP_URL));
        assert_eq!(param(&url, "size").as_deref(), Some("1000x1000"));
        assert_eq!(param(&url, "center").as_deref(), Some("40.7485,-73.9855"));
        assert_eq!(param(&url, "maptype").as_deref(), Some("roadmap"));
        assert_eq!(param(&url, "zoom").as_deref(), Some("19"));

        let paths: Vec<_> = pairs.iter().filter(|(k, _)| k == "path").map(|(_, v)| v.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "40.748,-73.986|40.748,-73.985|40.749,-73.985",
                "40.75,-73.98|40.75,-73.97"
            ]
        );
    }

    #[test]
    fn test_static_map_bad_status_passes_body_through() {
        let client = client(vec![Ok(HttpResponse {
            status: 403,
            body: b"err-image".to_vec(),
        })]);
        let image = client.get_static_map(&viewport()).unwrap();
        assert_eq!(image.position(), 0);
        assert_eq!(image.into_inner(), b"err-image".to_vec());
    }

    #[test]
    fn test_static_map_image() {
        let client = client(vec![Ok(HttpResponse::ok(b"\x89PNG".to_vec()))]);
        let image = client.get_static_map(&viewport()).unwrap();
        assert_eq!(image.position(), 0);
        assert_eq!(image.into_inner(), b"\x89PNG".to_vec());
    }

    #[test]
    fn test_custom_endpoints() {
        let endpoints = Endpoints {
            streetview: "http://localhost:8080/sv".to_string(),
            ..Endpoints::default()
        };
        let client = client(Vec::new()).with_endpoints(endpoints);
        let url = client
            .streetview_url("x", CameraAim { fov: 65, pitch: 10 })
            .unwrap();
        assert!(url.starts_with("http://localhost:8080/sv?"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let endpoints = Endpoints {
            geocode: "not a url".to_string(),
            ..Endpoints::default()
        };
        let client = client(Vec::new()).with_endpoints(endpoints);
        assert!(matches!(
            client.geocode("1 Main St"),
            Err(GeocodeError::Request(ProviderError::InvalidUrl(_)))
        ));
    }

    #[test]
    fn test_format_latlng() {
        assert_eq!(format_latlng(40.0, -73.0), "40,-73");
        assert_eq!(format_latlng(40.123456789, -73.5), "40.12345679,-73.5");
        assert_eq!(format_latlng(-0.0000000001, 0.0), "0,0");
    }
}
