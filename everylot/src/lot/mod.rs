//! The lot record and how a run chooses one.
//!
//! A [`Lot`] is one row of the `lots` table, converted into named optional
//! fields at the storage boundary. Columns the crate has no field for are kept
//! as text in [`Lot::extra`] so user-supplied format strings can still refer to
//! them.

use std::collections::BTreeMap;
use std::fmt;

use crate::format::FieldSource;

/// Which lot a run acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotSelector {
    /// The lot with exactly this identifier.
    ById(i64),
    /// The lowest identifier that has not been posted yet.
    NextUnposted,
}

impl LotSelector {
    /// Selector for an optional explicit identifier.
    pub fn from_id(id: Option<i64>) -> Self {
        match id {
            Some(id) => LotSelector::ById(id),
            None => LotSelector::NextUnposted,
        }
    }
}

impl fmt::Display for LotSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotSelector::ById(id) => write!(f, "id = {}", id),
            LotSelector::NextUnposted => write!(f, "next unposted"),
        }
    }
}

/// One parcel record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lot {
    /// Unique row identifier.
    pub id: i64,

    /// Street address, e.g. "1 Main St".
    pub address: Option<String>,

    pub city: Option<String>,

    pub state: Option<String>,

    pub zip: Option<String>,

    /// Latitude in degrees.
    pub lat: Option<f64>,

    /// Longitude in degrees.
    pub lon: Option<f64>,

    /// Parcel boundary as well-known binary.
    pub geometry: Option<Vec<u8>>,

    /// Number of floors of the building on the lot, if known.
    pub floors: Option<f64>,

    /// Post identifier once published; `None` or `Some(0)` means unposted.
    pub tweeted: Option<i64>,

    /// Every other column, rendered as text.
    pub extra: BTreeMap<String, String>,
}

impl Lot {
    /// Creates an otherwise empty lot with the given identifier.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Returns `(lat, lon)` when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Whether the lot has already been posted.
    pub fn is_posted(&self) -> bool {
        self.tweeted.is_some_and(|id| id != 0)
    }
}

impl FieldSource for Lot {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "address" => self.address.clone(),
            "city" => self.city.clone(),
            "state" => self.state.clone(),
            "zip" => self.zip.clone(),
            "lat" => self.lat.map(format_coordinate),
            "lon" => self.lon.map(format_coordinate),
            "floors" => self.floors.map(format_coordinate),
            "tweeted" => self.tweeted.map(|t| t.to_string()),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// Formats a coordinate or other REAL value keeping the precision it was stored with.
///
/// Whole numbers keep a trailing `.0` so `40.0` does not turn into `40`.
pub fn format_coordinate(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}
