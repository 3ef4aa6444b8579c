//! Per-day attendance state machine
//!
//! Every mutation of a `(user, date)` slot is computed by [`transition`], a pure
//! function from the slot's current state and an action to the next state or a
//! refusal. Geofencing happens before this point and is not its concern.

use chrono::{NaiveDate, NaiveTime};
use punchclock_api::{AttendanceRecord, AttendanceStatus, Location, PunchRejection};

/// Something a user or administrator does to one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttendanceAction {
    /// Set the day's status directly
    Mark(AttendanceStatus),
    PunchIn { location: Option<Location> },
    PunchOut { location: Option<Location> },
}

/// The mutable part of a record; ids, keys and notes are not touched here
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotState {
    pub status: AttendanceStatus,
    pub punch_in_time: Option<NaiveTime>,
    pub punch_out_time: Option<NaiveTime>,
    pub location: Option<Location>,
}

impl SlotState {
    fn fresh(status: AttendanceStatus) -> Self {
        Self {
            status,
            punch_in_time: None,
            punch_out_time: None,
            location: None,
        }
    }

    pub fn of(record: &AttendanceRecord) -> Self {
        Self {
            status: record.status,
            punch_in_time: record.punch_in_time,
            punch_out_time: record.punch_out_time,
            location: record.location,
        }
    }

    pub fn apply_to(&self, record: &mut AttendanceRecord) {
        record.status = self.status;
        record.punch_in_time = self.punch_in_time;
        record.punch_out_time = self.punch_out_time;
        record.location = self.location;
    }
}

/// Knobs of the state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionRules {
    /// Refuse punch-out on a record that has no punch-in time
    pub strict_punch_out: bool,
}

/// Outcome of applying an action to a slot
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Write this state (creating the record when the slot was empty)
    Write(SlotState),
    /// Leave the slot untouched
    Refuse(PunchRejection),
}

/// Compute the next state of the slot for `date`.
///
/// `current` is `None` for an empty slot; `at` is the wall-clock time stamped
/// onto punches.
pub fn transition(
    current: Option<SlotState>,
    action: AttendanceAction,
    date: NaiveDate,
    at: NaiveTime,
    rules: TransitionRules,
) -> Transition {
    match action {
        AttendanceAction::Mark(status) => Transition::Write(marked(current, status, at)),

        AttendanceAction::PunchIn { location } => {
            let mut next = current.unwrap_or_else(|| SlotState::fresh(AttendanceStatus::Present));
            next.status = AttendanceStatus::Present;
            next.punch_in_time = Some(at);
            next.location = merge_location(location, next.location);
            Transition::Write(next)
        }

        AttendanceAction::PunchOut { location } => {
            let Some(mut next) = current else {
                return Transition::Refuse(PunchRejection::NoRecordForDay { date });
            };
            if rules.strict_punch_out && next.punch_in_time.is_none() {
                return Transition::Refuse(PunchRejection::NotPunchedIn { date });
            }
            next.punch_out_time = Some(at);
            next.location = merge_location(location, next.location);
            Transition::Write(next)
        }
    }
}

/// Marking never refuses, so it has its own infallible entry point.
///
/// Becoming present stamps a punch-in time unless one is already there.
pub fn marked(current: Option<SlotState>, status: AttendanceStatus, at: NaiveTime) -> SlotState {
    let mut next = current.unwrap_or_else(|| SlotState::fresh(status));
    next.status = status;
    if status == AttendanceStatus::Present && next.punch_in_time.is_none() {
        next.punch_in_time = Some(at);
    }
    next
}

/// Reported location, else what the record had, else the null pair
fn merge_location(reported: Option<Location>, existing: Option<Location>) -> Option<Location> {
    Some(reported.or(existing).unwrap_or_else(Location::unknown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use punchclock_api::Coordinate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 7).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn write(result: Transition) -> SlotState {
        match result {
            Transition::Write(state) => state,
            Transition::Refuse(reason) => panic!("unexpected refusal: {:?}", reason),
        }
    }

    const LENIENT: TransitionRules = TransitionRules {
        strict_punch_out: false,
    };

    #[test]
    fn mark_present_stamps_punch_in_once() {
        let first = write(transition(
            None,
            AttendanceAction::Mark(AttendanceStatus::Present),
            date(),
            t(9, 0),
            LENIENT,
        ));
        assert_eq!(first.punch_in_time, Some(t(9, 0)));
        assert!(first.location.is_none());

        let again = write(transition(
            Some(first),
            AttendanceAction::Mark(AttendanceStatus::Present),
            date(),
            t(11, 0),
            LENIENT,
        ));
        assert_eq!(again.punch_in_time, Some(t(9, 0)));
    }

    #[test]
    fn mark_absent_keeps_existing_punches() {
        let mut punched = SlotState::fresh(AttendanceStatus::Present);
        punched.punch_in_time = Some(t(9, 0));

        let absent = write(transition(
            Some(punched),
            AttendanceAction::Mark(AttendanceStatus::Absent),
            date(),
            t(10, 0),
            LENIENT,
        ));
        assert_eq!(absent.status, AttendanceStatus::Absent);
        assert_eq!(absent.punch_in_time, Some(t(9, 0)));
    }

    #[test]
    fn mark_absent_on_empty_slot_has_no_times() {
        let absent = write(transition(
            None,
            AttendanceAction::Mark(AttendanceStatus::Absent),
            date(),
            t(10, 0),
            LENIENT,
        ));
        assert!(absent.punch_in_time.is_none());
        assert!(absent.punch_out_time.is_none());
    }

    #[test]
    fn punch_in_overrides_status_and_time() {
        let half_day = SlotState::fresh(AttendanceStatus::HalfDay);
        let next = write(transition(
            Some(half_day),
            AttendanceAction::PunchIn { location: None },
            date(),
            t(8, 30),
            LENIENT,
        ));

        assert_eq!(next.status, AttendanceStatus::Present);
        assert_eq!(next.punch_in_time, Some(t(8, 30)));
        assert_eq!(next.location, Some(Location::unknown()));
    }

    #[test]
    fn punch_keeps_previous_location_when_none_reported() {
        let office = Location::at(Coordinate::new(30.327224, 78.012583));
        let punched_in = write(transition(
            None,
            AttendanceAction::PunchIn {
                location: Some(office),
            },
            date(),
            t(9, 0),
            LENIENT,
        ));

        let punched_out = write(transition(
            Some(punched_in),
            AttendanceAction::PunchOut { location: None },
            date(),
            t(17, 0),
            LENIENT,
        ));
        assert_eq!(punched_out.location, Some(office));
        assert_eq!(punched_out.punch_in_time, Some(t(9, 0)));
        assert_eq!(punched_out.punch_out_time, Some(t(17, 0)));
        assert_eq!(punched_out.status, AttendanceStatus::Present);
    }

    #[test]
    fn punch_out_needs_a_record() {
        let result = transition(
            None,
            AttendanceAction::PunchOut { location: None },
            date(),
            t(17, 0),
            LENIENT,
        );
        assert_eq!(
            result,
            Transition::Refuse(PunchRejection::NoRecordForDay { date: date() })
        );
    }

    #[test]
    fn lenient_punch_out_allows_missing_punch_in() {
        let absent = SlotState::fresh(AttendanceStatus::Absent);
        let next = write(transition(
            Some(absent),
            AttendanceAction::PunchOut { location: None },
            date(),
            t(17, 0),
            LENIENT,
        ));

        assert_eq!(next.status, AttendanceStatus::Absent);
        assert!(next.punch_in_time.is_none());
        assert_eq!(next.punch_out_time, Some(t(17, 0)));
    }

    #[test]
    fn strict_punch_out_refuses_missing_punch_in() {
        let absent = SlotState::fresh(AttendanceStatus::Absent);
        let result = transition(
            Some(absent),
            AttendanceAction::PunchOut { location: None },
            date(),
            t(17, 0),
            TransitionRules {
                strict_punch_out: true,
            },
        );
        assert_eq!(
            result,
            Transition::Refuse(PunchRejection::NotPunchedIn { date: date() })
        );
    }
}
