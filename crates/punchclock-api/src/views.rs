//! Decisions and read-side views derived from attendance records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AttendanceRecord, AttendanceStatus};

/// Why a punch was refused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum PunchRejection {
    /// Reported position is farther from the office than allowed
    OutsideGeofence {
        distance_meters: f64,
        radius_meters: f64,
    },
    /// Punch-out without any record for the day
    NoRecordForDay { date: NaiveDate },
    /// Punch-out on a record that was never punched in (strict mode only)
    NotPunchedIn { date: NaiveDate },
}

impl PunchRejection {
    /// User-facing explanation
    pub fn message(&self) -> String {
        match self {
            PunchRejection::OutsideGeofence { .. } => {
                "You must be within the office premises to mark attendance.".to_string()
            }
            PunchRejection::NoRecordForDay { date } => {
                format!("No attendance record for {}; punch in first.", date)
            }
            PunchRejection::NotPunchedIn { date } => {
                format!("Cannot punch out on {} without punching in.", date)
            }
        }
    }
}

/// Result of a punch-in or punch-out request
#[derive(Debug, Clone, PartialEq)]
pub enum PunchDecision {
    /// The punch was applied; carries the record as it now stands
    Accepted(AttendanceRecord),
    /// Nothing was changed
    Rejected { reason: PunchRejection },
}

impl PunchDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PunchDecision::Accepted(_))
    }

    pub fn record(&self) -> Option<&AttendanceRecord> {
        match self {
            PunchDecision::Accepted(record) => Some(record),
            PunchDecision::Rejected { .. } => None,
        }
    }
}

/// Where a user stands for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    NoRecord,
    /// Present with a punch-in and no punch-out yet
    PunchedIn,
    /// Present and punched out
    PunchedOut,
    /// Present but without a punch-in time (only reachable through stored data)
    PresentUnpunched,
    Absent,
    HalfDay,
}

impl DayState {
    pub fn of(record: Option<&AttendanceRecord>) -> Self {
        let Some(record) = record else {
            return DayState::NoRecord;
        };

        match record.status {
            AttendanceStatus::Absent => DayState::Absent,
            AttendanceStatus::HalfDay => DayState::HalfDay,
            AttendanceStatus::Present => match (record.punch_in_time, record.punch_out_time) {
                (_, Some(_)) => DayState::PunchedOut,
                (Some(_), None) => DayState::PunchedIn,
                (None, None) => DayState::PresentUnpunched,
            },
        }
    }
}

/// Today's punch state for the dashboard buttons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayView {
    pub date: NaiveDate,
    pub state: DayState,
    pub has_punched_in: bool,
    pub has_punched_out: bool,
    pub record: Option<AttendanceRecord>,
}

impl TodayView {
    pub fn new(date: NaiveDate, record: Option<AttendanceRecord>) -> Self {
        Self {
            date,
            state: DayState::of(record.as_ref()),
            has_punched_in: record.as_ref().is_some_and(|r| r.has_punched_in()),
            has_punched_out: record.as_ref().is_some_and(|r| r.has_punched_out()),
            record,
        }
    }
}

/// Per-user counts shown on the staff dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
    pub half_days: usize,
}

impl AttendanceSummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut summary, record| {
                summary.total_days += 1;
                match record.status {
                    AttendanceStatus::Present => summary.present_days += 1,
                    AttendanceStatus::Absent => summary.absent_days += 1,
                    AttendanceStatus::HalfDay => summary.half_days += 1,
                }
                summary
            })
    }
}
