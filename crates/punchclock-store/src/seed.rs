//! Seed dataset used when no attendance has been persisted yet

use chrono::{NaiveDate, NaiveTime};
use punchclock_api::{AttendanceRecord, AttendanceStatus, Coordinate, Location};
use punchclock_util::{RecordId, UserId};

struct SeedRow {
    user: u64,
    date: (i32, u32, u32),
    status: AttendanceStatus,
    punch_in: Option<(u32, u32, u32)>,
    punch_out: Option<(u32, u32, u32)>,
    notes: Option<&'static str>,
}

const OFFICE: Coordinate = Coordinate::new(30.327224, 78.012583);

const SEED_ROWS: &[SeedRow] = &[
    SeedRow {
        user: 2,
        date: (2025, 4, 1),
        status: AttendanceStatus::Present,
        punch_in: Some((9, 2, 11)),
        punch_out: Some((17, 31, 4)),
        notes: None,
    },
    SeedRow {
        user: 3,
        date: (2025, 4, 1),
        status: AttendanceStatus::Present,
        punch_in: Some((9, 15, 40)),
        punch_out: Some((18, 0, 2)),
        notes: None,
    },
    SeedRow {
        user: 4,
        date: (2025, 4, 1),
        status: AttendanceStatus::Absent,
        punch_in: None,
        punch_out: None,
        notes: Some("Sick leave"),
    },
    SeedRow {
        user: 2,
        date: (2025, 4, 2),
        status: AttendanceStatus::HalfDay,
        punch_in: Some((9, 0, 0)),
        punch_out: Some((13, 0, 0)),
        notes: Some("Left after lunch"),
    },
    SeedRow {
        user: 3,
        date: (2025, 4, 2),
        status: AttendanceStatus::Present,
        punch_in: Some((8, 55, 30)),
        punch_out: Some((17, 45, 12)),
        notes: None,
    },
    SeedRow {
        user: 4,
        date: (2025, 4, 2),
        status: AttendanceStatus::Present,
        punch_in: Some((9, 30, 5)),
        punch_out: None,
        notes: None,
    },
];

fn hms((h, m, s): (u32, u32, u32)) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, s)
}

/// Fixed sample records for a fresh installation.
///
/// Ids run from 1 in order; punched rows carry the office location.
pub fn seed_records() -> Vec<AttendanceRecord> {
    SEED_ROWS
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let (y, m, d) = row.date;
            let date = NaiveDate::from_ymd_opt(y, m, d)?;

            let mut record = AttendanceRecord::new(
                RecordId::new(index as u64 + 1),
                UserId::new(row.user),
                date,
                row.status,
            );
            record.punch_in_time = row.punch_in.and_then(hms);
            record.punch_out_time = row.punch_out.and_then(hms);
            record.notes = row.notes.map(str::to_string);
            if record.punch_in_time.is_some() {
                record.location = Some(Location::at(OFFICE));
            }
            Some(record)
        })
        .collect()
}
