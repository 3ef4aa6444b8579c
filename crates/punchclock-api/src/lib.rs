//! Attendance data model for punchclock
//!
//! This crate defines the types shared by the store, the core engine and
//! front-ends:
//! - Attendance records and their persisted JSON shape
//! - Locations and coordinates
//! - Punch decisions and read-side views

mod types;
mod views;

pub use types::*;
pub use views::*;

/// Key under which the whole record sequence is persisted
pub const RECORDS_STORAGE_KEY: &str = "attendanceRecords";
