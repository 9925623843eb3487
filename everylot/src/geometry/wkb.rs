//! Well-known binary decoding.
//!
//! Parcel boundaries are stored as WKB blobs. The reader accepts either byte
//! order, ISO type codes with Z/M/ZM offsets (1000/2000/3000) and PostGIS
//! EWKB flags, including an embedded SRID. Only X and Y are kept.

use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use thiserror::Error;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Deepest geometry collection nesting accepted.
pub const MAX_DEPTH: usize = 32;

/// Errors that can occur while decoding WKB.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WkbError {
    /// Input ended before the geometry was complete.
    #[error("unexpected end of WKB at byte {0}")]
    UnexpectedEof(usize),

    /// Byte-order marker other than 0 or 1.
    #[error("invalid byte order marker {0}")]
    InvalidByteOrder(u8),

    /// Geometry type code that is not part of simple features.
    #[error("unknown WKB geometry type {0}")]
    UnknownType(u32),

    /// Bytes left over after the geometry.
    #[error("{0} trailing bytes after WKB geometry")]
    TrailingBytes(usize),

    /// Geometry collections nested deeper than [`MAX_DEPTH`].
    #[error("WKB geometry collections nested deeper than {0}")]
    TooDeep(usize),
}

/// Decodes a single WKB geometry.
pub fn decode(bytes: &[u8]) -> Result<Geometry<f64>, WkbError> {
    let mut reader = Reader::new(bytes);
    let geometry = reader.geometry()?;
    let remaining = bytes.len() - reader.pos;
    if remaining > 0 {
        return Err(WkbError::TrailingBytes(remaining));
    }
    Ok(geometry)
}

/// Human-readable name of a geometry's type, e.g. `"MultiPolygon"`.
pub fn type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    Big,
    Little,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    order: ByteOrder,
    kind: u32,
    extra_dims: usize,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            depth: 0,
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WkbError> {
        let end = self.pos + N;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(WkbError::UnexpectedEof(self.pos))?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, WkbError> {
        Ok(self.take::<1>()?[0])
    }

    fn u32(&mut self, order: ByteOrder) -> Result<u32, WkbError> {
        let raw = self.take::<4>()?;
        Ok(match order {
            ByteOrder::Big => u32::from_be_bytes(raw),
            ByteOrder::Little => u32::from_le_bytes(raw),
        })
    }

    fn f64(&mut self, order: ByteOrder) -> Result<f64, WkbError> {
        let raw = self.take::<8>()?;
        Ok(match order {
            ByteOrder::Big => f64::from_be_bytes(raw),
            ByteOrder::Little => f64::from_le_bytes(raw),
        })
    }

    fn header(&mut self) -> Result<Header, WkbError> {
        let order = match self.u8()? {
            0 => ByteOrder::Big,
            1 => ByteOrder::Little,
            other => return Err(WkbError::InvalidByteOrder(other)),
        };

        let raw = self.u32(order)?;
        let mut extra_dims = 0;
        if raw & EWKB_Z != 0 {
            extra_dims += 1;
        }
        if raw & EWKB_M != 0 {
            extra_dims += 1;
        }
        if raw & EWKB_SRID != 0 {
            self.u32(order)?;
        }

        let code = raw & 0x0FFF_FFFF;
        let (kind, iso_dims) = match code / 1000 {
            0 => (code, 0),
            1 | 2 => (code % 1000, 1),
            3 => (code % 1000, 2),
            _ => return Err(WkbError::UnknownType(raw)),
        };

        Ok(Header {
            order,
            kind,
            extra_dims: extra_dims + iso_dims,
        })
    }

    fn coord(&mut self, header: Header) -> Result<Coord<f64>, WkbError> {
        let x = self.f64(header.order)?;
        let y = self.f64(header.order)?;
        for _ in 0..header.extra_dims {
            self.f64(header.order)?;
        }
        Ok(Coord { x, y })
    }

    fn count(&mut self, header: Header) -> Result<usize, WkbError> {
        let n = self.u32(header.order)? as usize;
        // Every element takes at least one byte; reject counts the input cannot hold.
        if n > self.bytes.len() - self.pos {
            return Err(WkbError::UnexpectedEof(self.bytes.len()));
        }
        Ok(n)
    }

    fn line_string(&mut self, header: Header) -> Result<LineString<f64>, WkbError> {
        let n = self.count(header)?;
        let coords = (0..n)
            .map(|_| self.coord(header))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LineString::new(coords))
    }

    fn polygon(&mut self, header: Header) -> Result<Polygon<f64>, WkbError> {
        let n = self.count(header)?;
        let mut rings = (0..n)
            .map(|_| self.line_string(header))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
        Ok(Polygon::new(exterior, rings.collect()))
    }

    /// Reads `n` nested geometries of one kind, each with its own header.
    fn members<T>(
        &mut self,
        header: Header,
        expected: u32,
        mut read: impl FnMut(&mut Self, Header) -> Result<T, WkbError>,
    ) -> Result<Vec<T>, WkbError> {
        let n = self.count(header)?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let inner = self.header()?;
            if inner.kind != expected {
                return Err(WkbError::UnknownType(inner.kind));
            }
            out.push(read(self, inner)?);
        }
        Ok(out)
    }

    fn geometry(&mut self) -> Result<Geometry<f64>, WkbError> {
        let header = self.header()?;
        self.body(header)
    }

    fn body(&mut self, header: Header) -> Result<Geometry<f64>, WkbError> {
        Ok(match header.kind {
            1 => Geometry::Point(Point::from(self.coord(header)?)),
            2 => Geometry::LineString(self.line_string(header)?),
            3 => Geometry::Polygon(self.polygon(header)?),
            4 => {
                let points = self.members(header, 1, |r, h| r.coord(h).map(Point::from))?;
                Geometry::MultiPoint(MultiPoint::new(points))
            }
            5 => {
                let lines = self.members(header, 2, Self::line_string)?;
                Geometry::MultiLineString(MultiLineString::new(lines))
            }
            6 => {
                let polygons = self.members(header, 3, Self::polygon)?;
                Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }
            7 => {
                if self.depth >= MAX_DEPTH {
                    return Err(WkbError::TooDeep(MAX_DEPTH));
                }
                self.depth += 1;
                let n = self.count(header)?;
                let geometries = (0..n)
                    .map(|_| self.geometry())
                    .collect::<Result<Vec<_>, _>>()?;
                self.depth -= 1;
                Geometry::GeometryCollection(GeometryCollection::new_from(geometries))
            }
            other => return Err(WkbError::UnknownType(other)),
        })
    }
}
