//! Attendance engine for punchclock
//!
//! This crate is the heart of punchclock, containing:
//! - Geofence evaluation (haversine distance to the office)
//! - The record ledger (one record per user per day, insertion order kept)
//! - The per-day state machine (no record -> punched in -> punched out,
//!   with absent and half-day reachable by marking)
//! - The engine tying these to the store
//! - The check-in desk that turns location answers into punches or absences

mod checkin;
mod engine;
mod geofence;
mod ledger;
mod transition;

pub use checkin::*;
pub use engine::*;
pub use geofence::*;
pub use ledger::*;
pub use transition::*;
