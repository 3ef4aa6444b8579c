//! Attendance record types and their persisted shape

use chrono::{NaiveDate, NaiveTime};
use punchclock_util::{RecordId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attendance status of a user for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::HalfDay => "half-day",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "half-day" | "half_day" | "halfday" => Ok(AttendanceStatus::HalfDay),
            other => Err(format!(
                "Unknown status '{}'; expected present|absent|half-day",
                other
            )),
        }
    }
}

/// A resolved point on the earth, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Location attached to a punch, as reported by the caller.
///
/// Either half may be missing when the device could not provide it. A location
/// with a missing half carries no usable position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Location {
    /// The null pair: no position available
    pub const fn unknown() -> Self {
        Self {
            lat: None,
            lng: None,
        }
    }

    pub const fn at(coordinate: Coordinate) -> Self {
        Self {
            lat: Some(coordinate.lat),
            lng: Some(coordinate.lng),
        }
    }

    /// The usable position, if both halves are present
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

/// Natural key of an attendance record: one slot per user per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub user_id: UserId,
    pub date: NaiveDate,
}

impl SlotKey {
    pub fn new(user_id: UserId, date: NaiveDate) -> Self {
        Self { user_id, date }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user_id, self.date.format("%Y-%m-%d"))
    }
}

/// One user's attendance for one day.
///
/// Serialized with the camelCase field names of the persisted layout:
/// `id, userId, date, status, punchInTime?, punchOutTime?, notes?, location?`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub user_id: UserId,
    /// Calendar day, `YYYY-MM-DD`
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// `HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punch_in_time: Option<NaiveTime>,
    /// `HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punch_out_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl AttendanceRecord {
    /// A bare record with no punches, notes or location
    pub fn new(id: RecordId, user_id: UserId, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            id,
            user_id,
            date,
            status,
            punch_in_time: None,
            punch_out_time: None,
            notes: None,
            location: None,
        }
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.user_id, self.date)
    }

    pub fn has_punched_in(&self) -> bool {
        self.punch_in_time.is_some()
    }

    pub fn has_punched_out(&self) -> bool {
        self.punch_out_time.is_some()
    }
}
