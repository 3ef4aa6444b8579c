//! Location provider traits

use async_trait::async_trait;
use punchclock_api::Coordinate;
use std::time::Duration;
use thiserror::Error;

use crate::LocationCapabilities;

/// Errors from a location request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Location request timed out after {0:?}")]
    Timeout(Duration),
}

pub type LocationResult<T> = Result<T, LocationError>;

/// Options for a single position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    /// Prefer an accurate fix over a fast one
    pub high_accuracy: bool,

    /// Upper bound on how long the request may take
    pub timeout: Duration,

    /// Oldest cached fix that may be returned; zero forces a fresh fix
    pub max_age: Duration,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

/// Location provider trait - implemented by whatever can report a position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Get the capabilities of this provider
    fn capabilities(&self) -> &LocationCapabilities;

    /// Resolve the current position.
    ///
    /// Callers bound this with `request.timeout`; implementations need not.
    async fn current_position(&self, request: &LocationRequest) -> LocationResult<Coordinate>;
}
