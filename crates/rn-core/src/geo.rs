//! Geographic coordinate types and spatial utilities.
//!
//! `GeoPoint` stores latitude/longitude as `f64`.  Single precision would be
//! enough for metre-level snapping, but double precision keeps repeated
//! queries bit-identical after projection and keeps summed edge lengths stable.

use crate::CoordError;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like [`new`](Self::new) but rejects NaN/infinite values and
    /// out-of-range latitudes or longitudes.
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        let p = Self { lat, lon };
        p.validate()?;
        Ok(p)
    }

    /// Check that this point is finite and within WGS-84 ranges.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(CoordError::NotFinite { lat: self.lat, lon: self.lon });
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(CoordError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(CoordError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// `[lat, lon]` pair, the order route geometries are emitted in.
    #[inline]
    pub fn lat_lon(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Axis-aligned latitude/longitude rectangle.  Does not wrap the antimeridian.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Build from two opposite corners given in any order.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west:  a.lon.min(b.lon),
            north: a.lat.max(b.lat),
            east:  a.lon.max(b.lon),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::from_corners(first, first);
        for p in iter {
            bbox.south = bbox.south.min(p.lat);
            bbox.west  = bbox.west.min(p.lon);
            bbox.north = bbox.north.max(p.lat);
            bbox.east  = bbox.east.max(p.lon);
        }
        Some(bbox)
    }

    /// Inclusive containment check.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.south..=self.north).contains(&p.lat) && (self.west..=self.east).contains(&p.lon)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.south + self.north) * 0.5, (self.west + self.east) * 0.5)
    }
}
