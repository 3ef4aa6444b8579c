//! Integration tests for punchclock
//!
//! These drive the engine through its public crates and the built binary
//! end to end, against on-disk stores.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use punchclock_api::{AttendanceStatus, DayState, Location, RECORDS_STORAGE_KEY};
use punchclock_config::{DEFAULT_OFFICE, Settings, parse_config};
use punchclock_core::{AttendanceEngine, CheckInDesk, CheckInOutcome};
use punchclock_host_api::{FixedLocationProvider, LocationRequest};
use punchclock_store::{SqliteStore, Store, seed_records};
use punchclock_util::{UserId, database_path};
use serde_json::Value;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

struct Run {
    code: Option<i32>,
    json: Value,
}

fn punchclock(dir: &Path, args: &[&str]) -> Run {
    let output = Command::new(env!("CARGO_BIN_EXE_punchclock"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--data-dir")
        .arg(dir.join("data"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("PUNCHCLOCK_MOCK_TIME")
        .output()
        .expect("failed to run punchclock");

    let json = serde_json::from_slice(&output.stdout).unwrap_or(Value::Null);
    Run {
        code: output.status.code(),
        json,
    }
}

fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap()
}

fn office_args(command: &str, user: &str) -> Vec<String> {
    vec![
        command.to_string(),
        "--user".to_string(),
        user.to_string(),
        "--lat".to_string(),
        DEFAULT_OFFICE.lat.to_string(),
        "--lng".to_string(),
        DEFAULT_OFFICE.lng.to_string(),
    ]
}

fn run_owned(dir: &Path, args: &[String]) -> Run {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    punchclock(dir, &args)
}

#[test]
fn test_mark_then_list_by_user() {
    let dir = tempfile::tempdir().unwrap();

    let marked = punchclock(
        dir.path(),
        &["mark", "--user", "71", "--status", "half-day", "--date", "2025-05-02"],
    );
    assert_eq!(marked.code, Some(0));
    assert_eq!(marked.json["status"], "half-day");
    assert_eq!(marked.json["date"], "2025-05-02");

    let listed = punchclock(dir.path(), &["by-user", "--user", "71"]);
    let records = listed.json.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["userId"], 71);
}

#[test]
fn test_punch_in_and_out_at_the_office() {
    let dir = tempfile::tempdir().unwrap();

    let punched_in = run_owned(dir.path(), &office_args("punch-in", "72"));
    assert_eq!(punched_in.code, Some(0));
    assert_eq!(punched_in.json["outcome"], "recorded");

    let punched_out = run_owned(dir.path(), &office_args("punch-out", "72"));
    assert_eq!(punched_out.code, Some(0));
    let record = &punched_out.json["record"];
    assert_eq!(record["status"], "present");
    assert!(record["punchInTime"].is_string());
    assert!(record["punchOutTime"].is_string());

    let today = punchclock(dir.path(), &["today", "--user", "72"]);
    assert_eq!(today.json["state"], "punched_out");
}

#[test]
fn test_punch_far_from_office_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let far_lat = (DEFAULT_OFFICE.lat + 0.01).to_string();
    let lng = DEFAULT_OFFICE.lng.to_string();

    let run = punchclock(
        dir.path(),
        &["punch-in", "--user", "73", "--lat", &far_lat, "--lng", &lng],
    );

    assert_eq!(run.code, Some(1));
    assert_eq!(run.json["outcome"], "rejected");
    assert_eq!(run.json["reason"]["code"], "outside_geofence");
    assert_eq!(
        run.json["message"],
        "You must be within the office premises to mark attendance."
    );

    let listed = punchclock(dir.path(), &["by-user", "--user", "73"]);
    assert_eq!(listed.json.as_array().unwrap().len(), 0);
}

#[test]
fn test_denied_location_marks_absent() {
    let dir = tempfile::tempdir().unwrap();

    let run = punchclock(dir.path(), &["punch-in", "--user", "74", "--deny-location"]);

    assert_eq!(run.code, Some(0));
    assert_eq!(run.json["outcome"], "marked_absent");
    assert_eq!(run.json["record"]["status"], "absent");
    assert_eq!(run.json["message"], "Location denied. Marked as absent.");
}

#[test]
fn test_no_location_bypasses_geofence() {
    let dir = tempfile::tempdir().unwrap();

    let run = punchclock(dir.path(), &["punch-in", "--user", "75", "--no-location"]);

    assert_eq!(run.code, Some(0));
    assert_eq!(run.json["outcome"], "recorded");
    assert_eq!(run.json["record"]["location"]["lat"], Value::Null);
}

#[test]
fn test_punch_out_without_record_fails() {
    let dir = tempfile::tempdir().unwrap();

    let run = run_owned(dir.path(), &office_args("punch-out", "76"));

    assert_eq!(run.code, Some(1));
    assert_eq!(run.json["reason"]["code"], "no_record_for_day");
}

#[test]
fn test_config_can_disable_geofence() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        r#"
        config_version = 1

        [geofence]
        enabled = false

        [attendance]
        seed = "empty"
        "#,
    )
    .unwrap();

    let run = punchclock(
        dir.path(),
        &["punch-in", "--user", "77", "--lat", "0.0", "--lng", "0.0"],
    );
    assert_eq!(run.code, Some(0));

    let summary = punchclock(dir.path(), &["summary", "--user", "77"]);
    assert_eq!(summary.json["total_days"], 1);
    assert_eq!(summary.json["present_days"], 1);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "config_version = 1\n[geofence]\nradius_meters = -5.0\n",
    )
    .unwrap();

    let run = punchclock(dir.path(), &["by-date"]);
    assert_ne!(run.code, Some(0));
}

#[test]
fn test_corrupt_state_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    SqliteStore::open(database_path(&data_dir))
        .unwrap()
        .put_raw(RECORDS_STORAGE_KEY, "{broken")
        .unwrap();

    let run = punchclock(dir.path(), &["by-user", "--user", "2"]);
    assert_ne!(run.code, Some(0));

    let store = SqliteStore::open(database_path(&data_dir)).unwrap();
    assert_eq!(
        store.get_raw(RECORDS_STORAGE_KEY).unwrap().as_deref(),
        Some("{broken")
    );
}

#[test]
fn test_history_lists_seeded_month_newest_first() {
    let dir = tempfile::tempdir().unwrap();

    let run = punchclock(dir.path(), &["history", "--user", "2", "--month", "2025-04"]);

    let dates: Vec<&str> = run
        .json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-04-02", "2025-04-01"]);
}

#[test]
fn test_seeded_store_lists_by_date() {
    let dir = tempfile::tempdir().unwrap();

    let run = punchclock(dir.path(), &["by-date", "--date", "2025-04-01"]);

    let users: Vec<u64> = run
        .json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["userId"].as_u64().unwrap())
        .collect();
    assert_eq!(users, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_check_in_desk_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("punchclock.db");
    let settings = Settings::default();
    let user = UserId::new(80);

    {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let engine = AttendanceEngine::load(store, &settings).unwrap().into_shared();
        let desk = CheckInDesk::new(
            engine,
            Arc::new(FixedLocationProvider::at(DEFAULT_OFFICE)),
            LocationRequest::default(),
        )
        .with_clock(fixed_now);

        let outcome = desk.punch_in(user).await;
        assert!(matches!(outcome, CheckInOutcome::Recorded(_)));
    }

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let records = store.load_records().unwrap().unwrap();
    assert_eq!(records.len(), seed_records().len() + 1);

    let engine = AttendanceEngine::load(store, &settings).unwrap();
    let today = engine.today(user, fixed_now());
    assert_eq!(today.state, DayState::PunchedIn);
    assert_eq!(
        today.record.unwrap().location,
        Some(Location::at(DEFAULT_OFFICE))
    );
}

#[test]
fn test_engine_honours_parsed_config() {
    let settings = parse_config(
        r#"
        config_version = 1

        [attendance]
        strict_punch_out = true
        seed = "empty"
        "#,
    )
    .unwrap();

    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let mut engine = AttendanceEngine::load(store, &settings).unwrap();
    let user = UserId::new(81);
    let now = fixed_now();

    engine.mark(user, AttendanceStatus::Absent, None, now);
    assert!(!engine.punch_out(user, None, now).is_accepted());

    let earlier = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    engine.mark(user, AttendanceStatus::Present, Some(earlier), now);
    assert_eq!(engine.by_date(earlier).len(), 1);
}
