//! Geographic coordinates and great-circle distance.
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`]. Coordinates are decimal degrees (WGS-84 assumed, no
//! datum conversion).
//!
//! Out-of-range coordinates (latitude beyond ±90°, longitude beyond ±180°) are
//! not rejected. They pass through the formula unchanged and produce whatever
//! distance it yields; range checking is the caller's responsibility.

use serde::Serialize;

use crate::error::{Error, Result};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance_m(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Great-circle surface distance between two coordinates, in meters.
///
/// Coincident points yield exactly `0.0`: `a` is zero, so `atan2(0, 1)` is zero.
/// `a` is clamped to `[0, 1]` because rounding can push it just past 1 for
/// near-antipodal points, which would make `sqrt(1 - a)` NaN.
pub fn haversine_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin() * (dlat / 2.0).sin()
        + lat1.to_radians().cos()
            * lat2.to_radians().cos()
            * (dlng / 2.0).sin()
            * (dlng / 2.0).sin();
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c * 1000.0
}

/// Parse a raw coordinate value supplied by a caller.
///
/// Surrounding whitespace is ignored. Anything that does not parse as a
/// finite `f64` (including `NaN` and `inf`) is rejected.
pub fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidCoordinate {
            field,
            value: raw.to_string(),
        }),
    }
}
