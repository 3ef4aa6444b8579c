//! Location provider with a preset answer
//!
//! Used by the command-line front-end (position given as flags) and by tests.

use async_trait::async_trait;
use punchclock_api::Coordinate;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::{LocationCapabilities, LocationError, LocationProvider, LocationRequest, LocationResult};

/// What a [`FixedLocationProvider`] answers
#[derive(Debug, Clone, PartialEq)]
pub enum FixedResponse {
    Position(Coordinate),
    Denied,
    Unavailable(String),
}

/// Location provider that always gives the same answer
pub struct FixedLocationProvider {
    capabilities: LocationCapabilities,
    response: Mutex<FixedResponse>,
    delay: Option<Duration>,
    requests: AtomicUsize,
}

impl FixedLocationProvider {
    fn with_response(capabilities: LocationCapabilities, response: FixedResponse) -> Self {
        Self {
            capabilities,
            response: Mutex::new(response),
            delay: None,
            requests: AtomicUsize::new(0),
        }
    }

    /// Always reports `coordinate`
    pub fn at(coordinate: Coordinate) -> Self {
        Self::with_response(
            LocationCapabilities::full(),
            FixedResponse::Position(coordinate),
        )
    }

    /// Always refuses permission
    pub fn denied() -> Self {
        Self::with_response(LocationCapabilities::full(), FixedResponse::Denied)
    }

    /// A host without any location support
    pub fn unsupported() -> Self {
        Self::with_response(
            LocationCapabilities::none(),
            FixedResponse::Unavailable("no location support".into()),
        )
    }

    /// Delay every answer, to exercise request timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change the answer for subsequent requests
    pub fn set_response(&self, response: FixedResponse) {
        *self.response.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    /// Number of position requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    fn capabilities(&self) -> &LocationCapabilities {
        &self.capabilities
    }

    async fn current_position(&self, _request: &LocationRequest) -> LocationResult<Coordinate> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.response.lock().unwrap_or_else(|e| e.into_inner()).clone();
        match response {
            FixedResponse::Position(coordinate) => Ok(coordinate),
            FixedResponse::Denied => Err(LocationError::PermissionDenied),
            FixedResponse::Unavailable(reason) => Err(LocationError::PositionUnavailable(reason)),
        }
    }
}
