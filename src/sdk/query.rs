use serde::Serialize;
use thiserror::Error;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `[lon, lat]`, the ordering GeoJSON and openrouteservice expect.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn is_valid(&self) -> bool {
        valid_lat(self.lat) && valid_lon(self.lon)
    }
}

fn valid_lat(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

fn valid_lon(lon: f64) -> bool {
    lon.is_finite() && (-180.0..=180.0).contains(&lon)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Requested result count must be at least 1")]
    ZeroCount,
}

/// A validated user position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryPoint {
    location: GeoPoint,
}

impl QueryPoint {
    /// Rejects non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lon: f64) -> Result<Self, QueryError> {
        let location = GeoPoint::new(lat, lon);
        if location.is_valid() {
            return Ok(Self { location });
        }
        if !valid_lat(lat) {
            return Err(QueryError::LatitudeOutOfRange(lat));
        }
        Err(QueryError::LongitudeOutOfRange(lon))
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }
}

/// A position plus how many units the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestQuery {
    pub point: QueryPoint,
    pub count: usize,
}

impl NearestQuery {
    pub fn new(lat: f64, lon: f64, count: usize) -> Result<Self, QueryError> {
        let point = QueryPoint::new(lat, lon)?;
        if count == 0 {
            return Err(QueryError::ZeroCount);
        }
        Ok(Self { point, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_inclusive() {
        assert!(QueryPoint::new(90.0, 180.0).is_ok());
        assert!(QueryPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            QueryPoint::new(200.0, 8.0),
            Err(QueryError::LatitudeOutOfRange(200.0))
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            QueryPoint::new(9.0, -180.5),
            Err(QueryError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(QueryPoint::new(f64::NAN, 0.0).is_err());
        assert!(QueryPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_exactly_the_valid_points() {
        for (lat, lon) in [(9.0, 8.0), (90.0, -180.0), (-90.5, 0.0), (0.0, 181.0), (f64::NAN, 1.0)] {
            assert_eq!(QueryPoint::new(lat, lon).is_ok(), GeoPoint::new(lat, lon).is_valid());
        }
    }

    #[test]
    fn rejects_zero_count() {
        assert_eq!(NearestQuery::new(9.0, 8.0, 0), Err(QueryError::ZeroCount));
        assert_eq!(NearestQuery::new(9.0, 8.0, 11).map(|q| q.count), Ok(11));
    }

    #[test]
    fn coordinates_are_checked_before_count() {
        assert_eq!(
            NearestQuery::new(200.0, 8.0, 0),
            Err(QueryError::LatitudeOutOfRange(200.0))
        );
    }
}
