//! Validated settings structures

use crate::schema::{RawAttendance, RawConfig, RawGeofence, RawLocationRequest, RawServiceConfig};
use crate::validation::{parse_corrupt_state_policy, parse_seed_policy};
use punchclock_api::Coordinate;
use punchclock_host_api::LocationRequest;
use punchclock_util::default_data_dir;
use std::path::PathBuf;
use std::time::Duration;

/// Office reference point used when the config does not name one
pub const DEFAULT_OFFICE: Coordinate = Coordinate::new(30.327224, 78.012583);

/// Allowed distance from the office, in meters
pub const DEFAULT_RADIUS_METERS: f64 = 300.0;

/// Validated settings ready for use by the core engine
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub service: ServiceConfig,
    pub geofence: GeofencePolicy,
    pub attendance: AttendancePolicy,
    pub location: LocationRequest,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            service: ServiceConfig::from_raw(raw.service),
            geofence: GeofencePolicy::from_raw(raw.geofence),
            attendance: AttendancePolicy::from_raw(raw.attendance),
            location: convert_location_request(raw.location),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Circular boundary around the office
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofencePolicy {
    pub office: Coordinate,
    pub radius_meters: f64,
    /// When false, every punch is treated as inside
    pub enabled: bool,
}

impl GeofencePolicy {
    fn from_raw(raw: RawGeofence) -> Self {
        let office = match (raw.office_lat, raw.office_lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
            _ => DEFAULT_OFFICE,
        };

        Self {
            office,
            radius_meters: raw.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS),
            enabled: raw.enabled.unwrap_or(true),
        }
    }
}

impl Default for GeofencePolicy {
    fn default() -> Self {
        Self {
            office: DEFAULT_OFFICE,
            radius_meters: DEFAULT_RADIUS_METERS,
            enabled: true,
        }
    }
}

/// What to do when persisted attendance cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptStatePolicy {
    /// Refuse to start; the stored data is left untouched
    #[default]
    Fail,
    /// Start from the seed dataset; the corrupt data is overwritten on the next write
    Seed,
}

/// Dataset used when nothing has been persisted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    #[default]
    Builtin,
    Empty,
}

/// Attendance rules
#[derive(Debug, Clone, Copy, Default)]
pub struct AttendancePolicy {
    pub strict_punch_out: bool,
    pub on_corrupt_state: CorruptStatePolicy,
    pub seed: SeedPolicy,
}

impl AttendancePolicy {
    fn from_raw(raw: RawAttendance) -> Self {
        // Already validated by validate_config
        let on_corrupt_state = raw
            .on_corrupt_state
            .as_deref()
            .and_then(|v| parse_corrupt_state_policy(v).ok())
            .unwrap_or_default();
        let seed = raw
            .seed
            .as_deref()
            .and_then(|v| parse_seed_policy(v).ok())
            .unwrap_or_default();

        Self {
            strict_punch_out: raw.strict_punch_out,
            on_corrupt_state,
            seed,
        }
    }
}

fn convert_location_request(raw: RawLocationRequest) -> LocationRequest {
    let defaults = LocationRequest::default();

    LocationRequest {
        high_accuracy: raw.high_accuracy.unwrap_or(defaults.high_accuracy),
        timeout: raw
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout),
        max_age: raw
            .max_age_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_office() {
        let settings = Settings::default();
        assert_eq!(settings.geofence.office, DEFAULT_OFFICE);
        assert_eq!(settings.geofence.radius_meters, 300.0);
        assert!(settings.geofence.enabled);
        assert!(!settings.attendance.strict_punch_out);
        assert_eq!(settings.attendance.on_corrupt_state, CorruptStatePolicy::Fail);
        assert_eq!(settings.location.timeout, Duration::from_secs(10));
    }

    #[test]
    fn raw_values_override_defaults() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1

            [geofence]
            office_lat = 12.5
            office_lng = 77.5
            enabled = false

            [attendance]
            seed = "empty"

            [location]
            high_accuracy = false
            timeout_ms = 2500
            "#,
        )
        .unwrap();

        let settings = Settings::from_raw(raw);
        assert_eq!(settings.geofence.office, Coordinate::new(12.5, 77.5));
        assert_eq!(settings.geofence.radius_meters, DEFAULT_RADIUS_METERS);
        assert!(!settings.geofence.enabled);
        assert_eq!(settings.attendance.seed, SeedPolicy::Empty);
        assert!(!settings.location.high_accuracy);
        assert_eq!(settings.location.timeout, Duration::from_millis(2500));
    }
}
