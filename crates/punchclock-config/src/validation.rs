//! Configuration validation

use crate::schema::{RawConfig, RawGeofence, RawLocationRequest};
use crate::settings::{CorruptStatePolicy, SeedPolicy};
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Geofence: {0}")]
    GeofenceError(String),

    #[error("Invalid value '{value}' for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("Location request: {0}")]
    LocationRequestError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_geofence(&config.geofence));
    errors.extend(validate_location_request(&config.location));

    if let Some(value) = &config.attendance.on_corrupt_state
        && let Err(message) = parse_corrupt_state_policy(value)
    {
        errors.push(ValidationError::InvalidValue {
            field: "attendance.on_corrupt_state",
            value: value.clone(),
            message,
        });
    }

    if let Some(value) = &config.attendance.seed
        && let Err(message) = parse_seed_policy(value)
    {
        errors.push(ValidationError::InvalidValue {
            field: "attendance.seed",
            value: value.clone(),
            message,
        });
    }

    errors
}

fn validate_geofence(geofence: &RawGeofence) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Half an office coordinate is almost certainly a typo
    if geofence.office_lat.is_some() != geofence.office_lng.is_some() {
        errors.push(ValidationError::GeofenceError(
            "office_lat and office_lng must be set together".into(),
        ));
    }

    if let Some(lat) = geofence.office_lat
        && !(lat.is_finite() && (-90.0..=90.0).contains(&lat))
    {
        errors.push(ValidationError::GeofenceError(format!(
            "office_lat {} is outside -90..=90",
            lat
        )));
    }

    if let Some(lng) = geofence.office_lng
        && !(lng.is_finite() && (-180.0..=180.0).contains(&lng))
    {
        errors.push(ValidationError::GeofenceError(format!(
            "office_lng {} is outside -180..=180",
            lng
        )));
    }

    if let Some(radius) = geofence.radius_meters
        && !(radius.is_finite() && radius > 0.0)
    {
        errors.push(ValidationError::GeofenceError(format!(
            "radius_meters must be a positive number, got {}",
            radius
        )));
    }

    errors
}

fn validate_location_request(request: &RawLocationRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if request.timeout_ms == Some(0) {
        errors.push(ValidationError::LocationRequestError(
            "timeout_ms must be greater than zero".into(),
        ));
    }

    errors
}

/// Parse the corrupt-state recovery policy
pub fn parse_corrupt_state_policy(value: &str) -> Result<CorruptStatePolicy, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "fail" => Ok(CorruptStatePolicy::Fail),
        "seed" => Ok(CorruptStatePolicy::Seed),
        other => Err(format!("Unknown policy '{}'; expected fail|seed", other)),
    }
}

/// Parse the seed dataset selection
pub fn parse_seed_policy(value: &str) -> Result<SeedPolicy, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "builtin" => Ok(SeedPolicy::Builtin),
        "empty" | "none" => Ok(SeedPolicy::Empty),
        other => Err(format!("Unknown seed '{}'; expected builtin|empty", other)),
    }
}
