//! Geofence evaluation

use punchclock_api::{Coordinate, Location};
use punchclock_config::GeofencePolicy;

/// Mean earth radius used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates, in meters (haversine)
pub fn haversine_distance_meters(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Result of checking a reported location against the geofence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeofenceVerdict {
    Inside { distance_meters: f64 },
    Outside { distance_meters: f64 },
    /// No usable position, or the geofence is disabled
    Skipped,
}

/// Circular boundary around the office
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    center: Coordinate,
    radius_meters: f64,
    enabled: bool,
}

impl Geofence {
    pub fn from_policy(policy: &GeofencePolicy) -> Self {
        Self {
            center: policy.office,
            radius_meters: policy.radius_meters,
            enabled: policy.enabled,
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn distance_to(&self, point: Coordinate) -> f64 {
        haversine_distance_meters(point, self.center)
    }

    /// Check a punch location.
    ///
    /// A missing location, or one with either half null, skips the check.
    pub fn evaluate(&self, location: Option<&Location>) -> GeofenceVerdict {
        if !self.enabled {
            return GeofenceVerdict::Skipped;
        }

        let Some(point) = location.and_then(Location::coordinate) else {
            return GeofenceVerdict::Skipped;
        };

        // Inside iff the distance is at most the radius
        let distance_meters = self.distance_to(point);
        if distance_meters <= self.radius_meters {
            GeofenceVerdict::Inside { distance_meters }
        } else {
            GeofenceVerdict::Outside { distance_meters }
        }
    }
}

impl Default for Geofence {
    fn default() -> Self {
        Self::from_policy(&GeofencePolicy::default())
    }
}
