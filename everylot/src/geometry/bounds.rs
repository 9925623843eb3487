//! Axis-aligned geographic bounding boxes.

use geo::Rect;

/// A bounding box in degrees, ordered like shapely's `bounds`:
/// `(min_lng, min_lat, max_lng, max_lat)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// A box of `radius` degrees on every side of a point.
    pub fn around(lat: f64, lng: f64, radius: f64) -> Self {
        Self::new(lng - radius, lat - radius, lng + radius, lat + radius)
    }

    /// Centre as `(lng, lat)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.max_lng + self.min_lng) / 2.0,
            (self.max_lat + self.min_lat) / 2.0,
        )
    }

    /// Width and height in degrees.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.max_lng - self.min_lng, self.max_lat - self.min_lat)
    }

    /// Whether the point lies inside the box; edges count as inside.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lng..=self.max_lng).contains(&lng) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    /// Scales the box about its centre, multiplying both dimensions by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        let (cx, cy) = self.center();
        let (width, height) = self.dimensions();
        let half_w = width * factor / 2.0;
        let half_h = height * factor / 2.0;
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

/// Free-function form of [`Bounds::scale`].
pub fn scale_bounds(bounds: &Bounds, scale_factor: f64) -> Bounds {
    bounds.scale(scale_factor)
}
