//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where data lives
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Office geofence
    #[serde(default)]
    pub geofence: RawGeofence,

    /// Attendance rules and load policy
    #[serde(default)]
    pub attendance: RawAttendance,

    /// Options passed to the location provider
    #[serde(default)]
    pub location: RawLocationRequest,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Data directory for the store
    pub data_dir: Option<PathBuf>,
}

/// Geofence around the office
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawGeofence {
    /// Office latitude in degrees
    pub office_lat: Option<f64>,

    /// Office longitude in degrees
    pub office_lng: Option<f64>,

    /// Allowed distance from the office, in meters
    pub radius_meters: Option<f64>,

    /// When false, punches are never checked against the office
    pub enabled: Option<bool>,
}

/// Attendance rules
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAttendance {
    /// Refuse punch-out on a record without a punch-in time
    #[serde(default)]
    pub strict_punch_out: bool,

    /// "fail" or "seed"
    pub on_corrupt_state: Option<String>,

    /// "builtin" or "empty"
    pub seed: Option<String>,
}

/// Location request options
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLocationRequest {
    pub high_accuracy: Option<bool>,

    /// Give up on the provider after this many milliseconds
    pub timeout_ms: Option<u64>,

    /// Accept a cached fix at most this old
    pub max_age_ms: Option<u64>,
}
