//! Great-circle distance via the haversine formula.
//!
//! Uses a fixed Earth radius of 6378 km rather than an ellipsoidal model; a
//! documented simplification shared with the query-side scoring expression
//! so that filtering and reported distances stay consistent.

use crate::geo::Coordinate;
use crate::units::DistanceUnit;

/// Fixed spherical Earth radius, kilometers.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Haversine distance between two coordinate pairs, in the requested unit.
///
/// Pure computation: accepts only numeric pairs and performs no I/O. Callers
/// with address input resolve it to a [`Coordinate`] first.
pub fn distance(a: Coordinate, b: Coordinate, unit: DistanceUnit) -> f64 {
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let half = (delta_lat / 2.0).sin().powi(2)
        + (delta_lon / 2.0).sin().powi(2)
            * a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos();
    let central_angle = 2.0 * half.sqrt().atan2((1.0 - half).sqrt());

    EARTH_RADIUS_KM * central_angle * unit.ratio()
}
