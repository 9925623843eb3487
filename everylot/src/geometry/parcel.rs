//! Parcel boundaries and the map viewport drawn around them.

use geo::{BoundingRect, Centroid, Geometry, LineString, MultiPolygon, Point, Polygon};

use super::bounds::Bounds;
use super::zoom::calculate_zoom;
use super::{wkb, GeometryError};

/// How much surrounding context the map shows around the parcel.
pub const VIEWPORT_SCALE: f64 = 3.0;

/// A parcel boundary: one polygon or several.
#[derive(Debug, Clone, PartialEq)]
pub enum Parcel {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

/// What to request from the static map endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewport {
    /// Map centre (the parcel centroid).
    pub center: Point<f64>,

    pub zoom: u8,

    /// Rings to draw as overlay paths, each a list of `(lat, lng)` points.
    pub paths: Vec<Vec<(f64, f64)>>,
}

impl Parcel {
    /// Decodes a WKB blob into a parcel.
    pub fn from_wkb(bytes: &[u8]) -> Result<Self, GeometryError> {
        Self::try_from(wkb::decode(bytes)?)
    }

    /// Rings drawn on the map.
    ///
    /// A single polygon contributes all of its rings; a multipolygon only the
    /// exterior ring of each member.
    pub fn rings(&self) -> Vec<&LineString<f64>> {
        match self {
            Parcel::Polygon(polygon) => std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .collect(),
            Parcel::MultiPolygon(mp) => mp.iter().map(|p| p.exterior()).collect(),
        }
    }

    /// Overlay paths as `(lat, lng)` lists.
    pub fn paths(&self) -> Vec<Vec<(f64, f64)>> {
        self.rings()
            .into_iter()
            .map(|ring| ring.coords().map(|c| (c.y, c.x)).collect())
            .collect()
    }

    pub fn bounds(&self) -> Result<Bounds, GeometryError> {
        let rect = match self {
            Parcel::Polygon(p) => p.bounding_rect(),
            Parcel::MultiPolygon(mp) => mp.bounding_rect(),
        };
        rect.map(Bounds::from).ok_or(GeometryError::Empty)
    }

    pub fn centroid(&self) -> Result<Point<f64>, GeometryError> {
        let centroid = match self {
            Parcel::Polygon(p) => p.centroid(),
            Parcel::MultiPolygon(mp) => mp.centroid(),
        };
        centroid.ok_or(GeometryError::Empty)
    }

    /// Viewport centred on the parcel showing [`VIEWPORT_SCALE`] times its extent.
    pub fn viewport(&self, map_dim: (u32, u32)) -> Result<MapViewport, GeometryError> {
        let bounds = self.bounds()?.scale(VIEWPORT_SCALE);
        Ok(MapViewport {
            center: self.centroid()?,
            zoom: calculate_zoom(&bounds, map_dim),
            paths: self.paths(),
        })
    }
}

impl TryFrom<Geometry<f64>> for Parcel {
    type Error = GeometryError;

    fn try_from(geometry: Geometry<f64>) -> Result<Self, Self::Error> {
        match geometry {
            Geometry::Polygon(p) => Ok(Parcel::Polygon(p)),
            Geometry::MultiPolygon(mp) => Ok(Parcel::MultiPolygon(mp)),
            other => Err(GeometryError::Unsupported(
                wkb::type_name(&other).to_string(),
            )),
        }
    }
}
