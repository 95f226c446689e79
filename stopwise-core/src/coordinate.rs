//! Geographic points used for the origin and delivery stops.

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A WGS84 position.
///
/// Values are validated on construction and never change afterwards.
///
/// # Examples
/// ```
/// use stopwise_core::Coordinate;
///
/// let istanbul = Coordinate::new(41.0082, 28.9784)?;
/// assert_eq!(istanbul.latitude(), 41.0082);
/// assert_eq!(istanbul.longitude(), 28.9784);
/// # Ok::<(), stopwise_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude or longitude was NaN or infinite.
    #[error("coordinate components must be finite")]
    NonFinite,
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    /// Validate and construct a coordinate from latitude and longitude.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl TryFrom<Coord<f64>> for Coordinate {
    type Error = CoordinateError;

    /// Convert from a `geo` coordinate where `x = longitude` and `y = latitude`.
    fn try_from(value: Coord<f64>) -> Result<Self, Self::Error> {
        Self::new(value.y, value.x)
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_values(#[case] lat: f64, #[case] lon: f64) {
        assert!(Coordinate::new(lat, lon).is_ok());
    }

    #[rstest]
    #[case(90.5, 0.0, CoordinateError::LatitudeOutOfRange(90.5))]
    #[case(0.0, -180.5, CoordinateError::LongitudeOutOfRange(-180.5))]
    fn rejects_out_of_range(#[case] lat: f64, #[case] lon: f64, #[case] expected: CoordinateError) {
        assert_eq!(Coordinate::new(lat, lon), Err(expected));
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_non_finite(#[case] lat: f64, #[case] lon: f64) {
        assert_eq!(Coordinate::new(lat, lon), Err(CoordinateError::NonFinite));
    }

    #[rstest]
    fn converts_to_geo_with_longitude_as_x() {
        let coordinate = Coordinate::new(41.0082, 28.9784).expect("valid coordinate");
        let coord: Coord<f64> = coordinate.into();
        assert_eq!(coord, Coord { x: 28.9784, y: 41.0082 });
        assert_eq!(Coordinate::try_from(coord), Ok(coordinate));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn deserialisation_validates_range() {
        let ok: Coordinate = serde_json::from_str(r#"{"latitude": 41.0, "longitude": 29.0}"#)
            .expect("should deserialise");
        assert_eq!(ok.latitude(), 41.0);

        let err = serde_json::from_str::<Coordinate>(r#"{"latitude": 141.0, "longitude": 29.0}"#);
        assert!(err.is_err());
    }
}
