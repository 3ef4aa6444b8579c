//! Check-in policy around the location provider
//!
//! A punch first asks the provider for a position, then applies the punch with
//! whatever came back. Hosts that cannot locate at all punch with an unknown
//! location; a denied, failed or timed-out request marks the user absent.

use chrono::{DateTime, Local};
use punchclock_api::{AttendanceRecord, AttendanceStatus, Location, PunchDecision, PunchRejection};
use punchclock_host_api::{LocationError, LocationProvider, LocationRequest};
use punchclock_util::UserId;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::SharedEngine;

/// Message shown when a failed location request turns into an absence
pub const MARKED_ABSENT_MESSAGE: &str = "Location denied. Marked as absent.";

/// Result of a check-in attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInOutcome {
    /// The punch was applied
    Recorded(AttendanceRecord),
    /// The punch was refused; nothing changed
    Rejected(PunchRejection),
    /// No position could be obtained, so the day was marked absent instead
    MarkedAbsent {
        record: AttendanceRecord,
        cause: LocationError,
    },
}

impl CheckInOutcome {
    pub fn record(&self) -> Option<&AttendanceRecord> {
        match self {
            CheckInOutcome::Recorded(record) => Some(record),
            CheckInOutcome::MarkedAbsent { record, .. } => Some(record),
            CheckInOutcome::Rejected(_) => None,
        }
    }

    /// User-facing message, if the outcome needs one
    pub fn message(&self) -> Option<String> {
        match self {
            CheckInOutcome::Recorded(_) => None,
            CheckInOutcome::Rejected(reason) => Some(reason.message()),
            CheckInOutcome::MarkedAbsent { .. } => Some(MARKED_ABSENT_MESSAGE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PunchKind {
    In,
    Out,
}

/// Turns location answers into punches or absences
pub struct CheckInDesk {
    engine: SharedEngine,
    provider: Arc<dyn LocationProvider>,
    request: LocationRequest,
    clock: fn() -> DateTime<Local>,
}

impl CheckInDesk {
    pub fn new(
        engine: SharedEngine,
        provider: Arc<dyn LocationProvider>,
        request: LocationRequest,
    ) -> Self {
        Self {
            engine,
            provider,
            request,
            clock: punchclock_util::now,
        }
    }

    /// Replace the clock used to stamp punches
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub async fn punch_in(&self, user_id: UserId) -> CheckInOutcome {
        self.check_in(user_id, PunchKind::In).await
    }

    pub async fn punch_out(&self, user_id: UserId) -> CheckInOutcome {
        self.check_in(user_id, PunchKind::Out).await
    }

    async fn check_in(&self, user_id: UserId, kind: PunchKind) -> CheckInOutcome {
        // The engine stays unlocked while the provider is working
        let location = match self.resolve_location().await {
            Ok(location) => location,
            Err(cause) => {
                let now = (self.clock)();
                let record =
                    self.engine
                        .lock()
                        .await
                        .mark(user_id, AttendanceStatus::Absent, None, now);
                warn!(
                    user_id = %user_id,
                    kind = ?kind,
                    error = %cause,
                    "No position for punch, marked absent"
                );
                return CheckInOutcome::MarkedAbsent { record, cause };
            }
        };

        let now = (self.clock)();
        let mut engine = self.engine.lock().await;
        let decision = match kind {
            PunchKind::In => engine.punch_in(user_id, Some(location), now),
            PunchKind::Out => engine.punch_out(user_id, Some(location), now),
        };

        match decision {
            PunchDecision::Accepted(record) => CheckInOutcome::Recorded(record),
            PunchDecision::Rejected { reason } => CheckInOutcome::Rejected(reason),
        }
    }

    async fn resolve_location(&self) -> Result<Location, LocationError> {
        let capabilities = self.provider.capabilities();
        if !capabilities.can_locate {
            debug!("Provider cannot locate, punching without a position");
            return Ok(Location::unknown());
        }

        let request = LocationRequest {
            high_accuracy: self.request.high_accuracy && capabilities.can_high_accuracy,
            max_age: if capabilities.can_use_cached_fix {
                self.request.max_age
            } else {
                Duration::ZERO
            },
            ..self.request
        };

        match tokio::time::timeout(request.timeout, self.provider.current_position(&request)).await
        {
            Ok(Ok(coordinate)) => {
                info!(lat = coordinate.lat, lng = coordinate.lng, "Position resolved");
                Ok(Location::at(coordinate))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(LocationError::Timeout(request.timeout)),
        }
    }
}
