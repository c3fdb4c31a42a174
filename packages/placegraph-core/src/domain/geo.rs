//! Geographic value types

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on Earth as a latitude/longitude pair in decimal degrees.
///
/// Latitude is -90 to 90, longitude -180 to 180. The default value is the
/// (0, 0) null island coordinate used for placemarks without a point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters, by the haversine formula.
    pub fn distance_to(&self, other: Coordinate) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let dphi = (other.latitude - self.latitude).to_radians();
        let dlambda = (other.longitude - self.longitude).to_radians();

        let h = (dphi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        // Clamp against rounding drift past 1.0 for near-antipodal pairs
        let h = h.min(1.0);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

        EARTH_RADIUS_M * c
    }
}
