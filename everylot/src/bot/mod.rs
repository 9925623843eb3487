//! The per-run component.
//!
//! [`EveryLot`] loads one lot, produces an image of it, composes the post
//! and, once the caller has published that post, records the post id.

use std::fmt;
use std::io::Cursor;

use tracing::{debug, info, Span};

use crate::camera::{aim_camera, CameraAim};
use crate::compose::{compose, PostPayload};
use crate::config::EveryLotConfig;
use crate::format::Template;
use crate::geometry::{GeometryError, MapViewport, Parcel};
use crate::locate::streetviewable_location;
use crate::lot::{Lot, LotSelector};
use crate::provider::{GoogleMapsClient, HttpClient, IMAGE_SIZE};
use crate::store::LotStore;
use crate::Result;

/// Which kind of picture to fetch for a lot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSource {
    /// Street View photo of the building.
    #[default]
    StreetView,
    /// Roadmap with the parcel boundary drawn on it.
    Map,
}

impl ImageSource {
    /// File extension of the image the endpoint returns.
    pub fn file_extension(&self) -> &'static str {
        match self {
            ImageSource::StreetView => "jpg",
            ImageSource::Map => "png",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::StreetView => write!(f, "streetview"),
            ImageSource::Map => write!(f, "map"),
        }
    }
}

/// One run of the bot against one lot.
pub struct EveryLot<C: HttpClient> {
    store: LotStore,
    lot: Lot,
    search_format: Template,
    print_format: Template,
    maps: GoogleMapsClient<C>,
    span: Span,
}

impl<C: HttpClient> EveryLot<C> {
    /// Loads the lot chosen by `selector`.
    ///
    /// Every log event of this run is recorded inside `span`.
    ///
    /// # Errors
    ///
    /// Fails if a format string is malformed or no lot matches.
    pub fn new(
        store: LotStore,
        selector: LotSelector,
        config: &EveryLotConfig,
        http_client: C,
        span: Span,
    ) -> Result<Self> {
        let (search_format, print_format, lot) = span.in_scope(|| -> Result<_> {
            let search_format = Template::parse(&config.search_format)?;
            let print_format = Template::parse(&config.print_format)?;
            debug!(search_format = %search_format.as_str(), "Searching Street View with format");
            debug!(print_format = %print_format.as_str(), "Posting with format");

            let lot = store.select(selector)?;
            info!(lot_id = lot.id, %selector, "Loaded lot");
            Ok((search_format, print_format, lot))
        })?;

        let maps = GoogleMapsClient::new(http_client, config.api_key.clone())
            .with_endpoints(config.endpoints.clone());

        Ok(Self {
            store,
            lot,
            search_format,
            print_format,
            maps,
            span,
        })
    }

    /// The loaded lot.
    pub fn lot(&self) -> &Lot {
        &self.lot
    }

    /// Camera framing for the lot's building.
    pub fn aim_camera(&self) -> CameraAim {
        aim_camera(self.lot.floors)
    }

    /// Location string to request from Street View.
    pub fn streetviewable_location(&self) -> Result<String> {
        let _enter = self.span.enter();
        Ok(streetviewable_location(
            &self.lot,
            &self.search_format,
            &self.maps,
        )?)
    }

    /// Fetches a Street View photo of the lot.
    pub fn get_streetview_image(&self) -> Result<Cursor<Vec<u8>>> {
        let location = self.streetviewable_location()?;
        let aim = self.aim_camera();

        let _enter = self.span.enter();
        Ok(self.maps.get_streetview_image(&location, aim)?)
    }

    /// Parcel outline and framing for the map snapshot.
    pub fn map_viewport(&self) -> Result<MapViewport> {
        let geometry = self.lot.geometry.as_deref().ok_or(GeometryError::Missing)?;
        let parcel = Parcel::from_wkb(geometry)?;
        Ok(parcel.viewport((IMAGE_SIZE, IMAGE_SIZE))?)
    }

    /// Fetches a roadmap snapshot with the parcel outlined.
    pub fn get_maps_image(&self) -> Result<Cursor<Vec<u8>>> {
        let _enter = self.span.enter();
        let viewport = self.map_viewport()?;
        debug!(lot_id = self.lot.id, zoom = viewport.zoom, "Framed parcel");
        Ok(self.maps.get_static_map(&viewport)?)
    }

    /// Fetches the picture of the lot from `source`.
    pub fn fetch_image(&self, source: ImageSource) -> Result<Cursor<Vec<u8>>> {
        match source {
            ImageSource::StreetView => self.get_streetview_image(),
            ImageSource::Map => self.get_maps_image(),
        }
    }

    /// Composes the post, attaching already uploaded media.
    pub fn compose(&self, media_ids: Vec<String>) -> Result<PostPayload> {
        let _enter = self.span.enter();
        Ok(compose(&self.lot, &self.print_format, media_ids)?)
    }

    /// Records that the lot was published as post `post_id`.
    pub fn mark_as_tweeted(&mut self, post_id: i64) -> Result<()> {
        let _enter = self.span.enter();
        self.store.mark_as_tweeted(self.lot.id, post_id)?;
        self.lot.tweeted = Some(post_id);
        info!(lot_id = self.lot.id, post_id, "Marked lot as posted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::wkb::encode;
    use crate::provider::{HttpResponse, MockHttpClient, ProviderError, STATICMAP_URL};
    use crate::Error;
    use rusqlite::{params, Connection};

    const SQUARE: &[(f64, f64)] = &[
        (-73.9860, 40.7480),
        (-73.9850, 40.7480),
        (-73.9850, 40.7490),
        (-73.9860, 40.7490),
        (-73.9860, 40.7480),
    ];

    fn store() -> LotStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE lots (
                id INTEGER PRIMARY KEY, address TEXT, city TEXT, state TEXT,
                lat REAL, lon REAL, geometry BLOB, floors, tweeted INTEGER DEFAULT 0
            );",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO lots (id, address, city, state, lat, lon, geometry, floors)
             VALUES (5, '1 Main St', 'New York', 'NY', 40.7485, -73.9855, ?1, 6)",
            params![encode::polygon(&[SQUARE])],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO lots (id, address, geometry) VALUES (6, '2 Main St', ?1)",
            params![encode::point(-73.0, 40.0)],
        )
        .unwrap();
        LotStore::from_connection(conn)
    }

    fn bot(id: Option<i64>, responses: Vec<std::result::Result<HttpResponse, ProviderError>>) -> EveryLot<MockHttpClient> {
        EveryLot::new(
            store(),
            LotSelector::from_id(id),
            &EveryLotConfig::new("test_key"),
            MockHttpClient::new(responses),
            Span::none(),
        )
        .unwrap()
    }

    fn geocode_ok(lat: f64, lng: f64) -> std::result::Result<HttpResponse, ProviderError> {
        Ok(HttpResponse::ok(
            format!(
                r#"{{"results":[{{"geometry":{{"location":{{"lat":{},"lng":{}}}}}}}]}}"#,
                lat, lng
            )
            .into_bytes(),
        ))
    }

    #[test]
    fn test_loads_next_unposted_lot() {
        let bot = bot(None, Vec::new());
        assert_eq!(bot.lot().id, 5);
        assert_eq!(bot.aim_camera(), CameraAim { fov: 86, pitch: 20 });
    }

    #[test]
    fn test_streetview_with_confirmed_address() {
        let bot = bot(None, vec![geocode_ok(40.7486, -73.9851), Ok(HttpResponse::ok(b"jpeg".to_vec()))]);
        let image = bot.fetch_image(ImageSource::StreetView).unwrap();
        assert_eq!(image.into_inner(), b"jpeg".to_vec());

        let requests = bot.maps_requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].contains("location=1+Main+St%2C+New+York+NY"));
        assert!(requests[1].contains("fov=86"));
        assert!(requests[1].contains("pitch=20"));
    }

    #[test]
    fn test_streetview_falls_back_to_coordinates() {
        let bot = bot(None, vec![geocode_ok(34.05, -118.24), Ok(HttpResponse::ok(b"jpeg".to_vec()))]);
        bot.get_streetview_image().unwrap();
        let requests = bot.maps_requests();
        assert!(requests[1].contains("location=40.7485%2C-73.9855"));
    }

    #[test]
    fn test_streetview_transport_error_propagates() {
        let bot = bot(
            None,
            vec![geocode_ok(40.7485, -73.9855), Err(ProviderError::HttpError("reset".to_string()))],
        );
        assert!(matches!(bot.get_streetview_image(), Err(Error::Provider(_))));
    }

    #[test]
    fn test_maps_image() {
        let bot = bot(None, vec![Ok(HttpResponse::ok(b"png".to_vec()))]);
        let image = bot.fetch_image(ImageSource::Map).unwrap();
        assert_eq!(image.position(), 0);
        assert_eq!(image.into_inner(), b"png".to_vec());

        let requests = bot.maps_requests();
        assert!(requests[0].starts_with(STATICMAP_URL));
        assert!(requests[0].contains("maptype=roadmap"));
    }

    #[test]
    fn test_maps_image_rejects_points() {
        let bot = bot(Some(6), Vec::new());
        let err = bot.get_maps_image().unwrap_err();
        assert!(matches!(err, Error::Geometry(GeometryError::Unsupported(_))));
        assert!(bot.maps_requests().is_empty());
    }

    #[test]
    fn test_compose_and_mark() {
        let mut bot = bot(None, Vec::new());
        let payload = bot.compose(vec!["m1".to_string()]).unwrap();
        assert_eq!(payload.status, "1 Main St");
        assert_eq!(payload.lat, 40.7485);
        assert_eq!(payload.long, -73.9855);

        bot.mark_as_tweeted(123).unwrap();
        assert_eq!(bot.lot().tweeted, Some(123));
        let stored = bot.store.select(LotSelector::ById(5)).unwrap();
        assert_eq!(stored.tweeted, Some(123));
    }

    #[test]
    fn test_malformed_format_fails_before_loading() {
        let config = EveryLotConfig::new("k").with_print_format("{address");
        let result = EveryLot::new(
            store(),
            LotSelector::NextUnposted,
            &config,
            MockHttpClient::empty(),
            Span::none(),
        );
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_image_source() {
        assert_eq!(ImageSource::default(), ImageSource::StreetView);
        assert_eq!(ImageSource::StreetView.file_extension(), "jpg");
        assert_eq!(ImageSource::Map.file_extension(), "png");
        assert_eq!(ImageSource::Map.to_string(), "map");
    }

    impl EveryLot<MockHttpClient> {
        fn maps_requests(&self) -> Vec<String> {
            self.maps.http_client().requests()
        }
    }
}
