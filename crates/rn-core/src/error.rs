//! Coordinate validation errors.

use thiserror::Error;

/// A latitude/longitude pair that cannot name a point on the globe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("coordinate is not finite: lat={lat}, lon={lon}")]
    NotFinite { lat: f64, lon: f64 },

    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}
