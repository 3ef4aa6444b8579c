//! Time utilities for punchclock
//!
//! Attendance works on two wall-clock granularities: the calendar day a record
//! belongs to (`YYYY-MM-DD`) and the second a punch happened (`HH:MM:SS`).
//!
//! # Mock Time for Development
//!
//! In debug builds, the `PUNCHCLOCK_MOCK_TIME` environment variable can be set
//! to override the system time. The mock clock advances from the given instant
//! at the same rate as real time.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 09:30:00`)

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
#[cfg(debug_assertions)]
use chrono::{NaiveDateTime, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "PUNCHCLOCK_MOCK_TIME";

/// Format used for record dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Offset between mock time and real time, computed once per process.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // Wraps Local::now() for mock support
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S")
            else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    expected_format = "%Y-%m-%d %H:%M:%S",
                    "Invalid mock time format"
                );
                return None;
            };
            let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    "Failed to convert mock time to local timezone"
                );
                return None;
            };
            let offset = mock_dt.signed_duration_since(chrono::Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// The calendar day an instant belongs to
pub fn day_of(dt: &DateTime<Local>) -> NaiveDate {
    dt.date_naive()
}

/// The punch time of an instant, truncated to whole seconds
pub fn clock_time_of(dt: &DateTime<Local>) -> NaiveTime {
    let time = dt.time();
    // Sub-second precision would leak into the `HH:MM:SS` wire format.
    time.with_nanosecond(0).unwrap_or(time)
}

/// Parse a `YYYY-MM-DD` record date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| format!("Expected YYYY-MM-DD date, got '{}': {}", s, e))
}

/// Parse a `YYYY-MM` month into `(year, month)`.
pub fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let (year, month) = s
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("Expected YYYY-MM month, got '{}'", s))?;

    let year: i32 = year.parse().map_err(|_| format!("Invalid year in '{}'", s))?;
    let month: u32 = month.parse().map_err(|_| format!("Invalid month in '{}'", s))?;

    if !(1..=12).contains(&month) {
        return Err("Month must be 1-12".into());
    }

    Ok((year, month))
}
