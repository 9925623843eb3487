//! Post payload composition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::format::{FormatError, Template};
use crate::lot::Lot;

/// Everything the posting service needs besides the uploaded media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPayload {
    /// Status text.
    pub status: String,

    pub lat: f64,

    /// Longitude; named `long` to match the posting API.
    pub long: f64,

    /// Identifiers of media already uploaded to the posting service.
    pub media_ids: Vec<String>,
}

/// Builds the post for `lot`.
///
/// A lot missing a field used by `print_format` is an error: it is better to
/// stop than to post a half-empty status.
pub fn compose(
    lot: &Lot,
    print_format: &Template,
    media_ids: Vec<String>,
) -> Result<PostPayload, FormatError> {
    debug!(lot_id = lot.id, ?media_ids, "Composing post");

    let status = print_format.render(lot)?;

    Ok(PostPayload {
        status,
        lat: lot.lat.unwrap_or(0.0),
        long: lot.lon.unwrap_or(0.0),
        media_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> Lot {
        let mut lot = Lot::new(5);
        lot.address = Some("1 Main St".to_string());
        lot.lat = Some(40.0);
        lot.lon = Some(-73.0);
        lot
    }

    #[test]
    fn test_compose_keeps_coordinates() {
        let print = Template::parse("{address}").unwrap();
        let payload = compose(&lot(), &print, vec!["m1".to_string()]).unwrap();

        assert_eq!(
            payload,
            PostPayload {
                status: "1 Main St".to_string(),
                lat: 40.0,
                long: -73.0,
                media_ids: vec!["m1".to_string()],
            }
        );
    }

    #[test]
    fn test_payload_json_shape() {
        let print = Template::parse("{address}").unwrap();
        let payload = compose(&lot(), &print, vec!["m1".to_string(), "m2".to_string()]).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "1 Main St",
                "lat": 40.0,
                "long": -73.0,
                "media_ids": ["m1", "m2"],
            })
        );
        assert!(json["lat"].is_f64());
    }

    #[test]
    fn test_missing_coordinates_default_to_zero() {
        let mut lot = lot();
        lot.lat = None;
        lot.lon = None;
        let print = Template::parse("{address}").unwrap();
        let payload = compose(&lot, &print, Vec::new()).unwrap();
        assert_eq!((payload.lat, payload.long), (0.0, 0.0));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let print = Template::parse("{address}, {city}").unwrap();
        let err = compose(&lot(), &print, Vec::new()).unwrap_err();
        assert_eq!(err, FormatError::MissingField("city".to_string()));
    }
}
