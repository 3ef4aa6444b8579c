//! Shared utilities for punchclock
//!
//! This crate provides:
//! - ID types (UserId, RecordId)
//! - Clock helpers (mockable wall-clock, date/time formatting)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
