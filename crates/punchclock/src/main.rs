//! punchclock - geofenced staff attendance
//!
//! Command-line front-end wiring together:
//! - Configuration loading
//! - Store initialization
//! - The attendance engine
//! - The check-in desk with a location given on the command line

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use punchclock_api::{AttendanceStatus, Coordinate};
use punchclock_config::{Settings, load_config_or_default};
use punchclock_core::{AttendanceEngine, CheckInDesk, CheckInOutcome, SharedEngine};
use punchclock_host_api::FixedLocationProvider;
use punchclock_store::{SqliteStore, Store};
use punchclock_util::{UserId, database_path, default_config_path, parse_date, parse_month};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// punchclock - geofenced staff attendance
#[derive(Parser, Debug)]
#[command(name = "punchclock")]
#[command(about = "Record staff attendance with an office geofence", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/punchclock/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set PUNCHCLOCK_DATA_DIR env var)
    #[arg(short, long, env = "PUNCHCLOCK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set a user's status for a day, without any location check
    Mark {
        #[arg(long)]
        user: u64,

        /// present, absent or half-day
        #[arg(long)]
        status: AttendanceStatus,

        /// YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Punch in for today
    PunchIn {
        #[arg(long)]
        user: u64,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Punch out for today
    PunchOut {
        #[arg(long)]
        user: u64,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// List one day's records
    ByDate {
        /// YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// List one user's records
    ByUser {
        #[arg(long)]
        user: u64,
    },

    /// Count a user's present, absent and half days
    Summary {
        #[arg(long)]
        user: u64,
    },

    /// Show a user's punch state for today
    Today {
        #[arg(long)]
        user: u64,
    },

    /// List a user's records for one month, newest first
    History {
        #[arg(long)]
        user: u64,

        /// YYYY-MM
        #[arg(long, value_parser = parse_month)]
        month: (i32, u32),
    },
}

/// Where the punch position comes from
#[derive(clap::Args, Debug)]
struct LocationArgs {
    /// Reported latitude in degrees
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Reported longitude in degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Behave like a host without location support
    #[arg(long, conflicts_with_all = ["lat", "lng", "deny_location"])]
    no_location: bool,

    /// Behave as if the user refused location access
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    deny_location: bool,
}

impl LocationArgs {
    fn provider(&self) -> FixedLocationProvider {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => FixedLocationProvider::at(Coordinate::new(lat, lng)),
            _ if self.deny_location => FixedLocationProvider::denied(),
            _ => FixedLocationProvider::unsupported(),
        }
    }
}

/// What a command printed and whether it counts as success
struct Output {
    value: Value,
    success: bool,
}

impl Output {
    fn ok(value: Value) -> Self {
        Self {
            value,
            success: true,
        }
    }
}

fn check_in_output(outcome: CheckInOutcome) -> Output {
    let message = outcome.message();
    match outcome {
        CheckInOutcome::Recorded(record) => Output::ok(json!({
            "outcome": "recorded",
            "record": record,
        })),
        CheckInOutcome::Rejected(reason) => Output {
            value: json!({
                "outcome": "rejected",
                "reason": reason,
                "message": message,
            }),
            success: false,
        },
        CheckInOutcome::MarkedAbsent { record, cause } => Output::ok(json!({
            "outcome": "marked_absent",
            "record": record,
            "cause": cause.to_string(),
            "message": message,
        })),
    }
}

async fn execute(command: Command, engine: SharedEngine, settings: &Settings) -> Result<Output> {
    let now = punchclock_util::now();

    let output = match command {
        Command::Mark { user, status, date } => {
            let record = engine
                .lock()
                .await
                .mark(UserId::new(user), status, date, now);
            Output::ok(serde_json::to_value(record)?)
        }

        Command::PunchIn { user, location } => {
            let desk = CheckInDesk::new(engine, Arc::new(location.provider()), settings.location);
            check_in_output(desk.punch_in(UserId::new(user)).await)
        }

        Command::PunchOut { user, location } => {
            let desk = CheckInDesk::new(engine, Arc::new(location.provider()), settings.location);
            check_in_output(desk.punch_out(UserId::new(user)).await)
        }

        Command::ByDate { date } => {
            let date = date.unwrap_or_else(|| punchclock_util::day_of(&now));
            Output::ok(serde_json::to_value(engine.lock().await.by_date(date))?)
        }

        Command::ByUser { user } => {
            Output::ok(serde_json::to_value(engine.lock().await.by_user(UserId::new(user)))?)
        }

        Command::Summary { user } => Output::ok(serde_json::to_value(
            engine.lock().await.summary_for_user(UserId::new(user)),
        )?),

        Command::Today { user } => Output::ok(serde_json::to_value(
            engine.lock().await.today(UserId::new(user), now),
        )?),

        Command::History {
            user,
            month: (year, month),
        } => Output::ok(serde_json::to_value(
            engine
                .lock()
                .await
                .history_for_month(UserId::new(user), year, month),
        )?),
    };

    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the JSON result
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let settings = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| settings.service.data_dir.clone());
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = database_path(&data_dir);
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open store at {:?}", db_path))?,
    );

    info!(
        config_path = %args.config.display(),
        db_path = %db_path.display(),
        "punchclock starting"
    );

    if punchclock_util::is_mock_time_active() {
        warn!(now = %punchclock_util::now(), "Mock time is active");
    }
    if !store.is_healthy() {
        warn!(db_path = %db_path.display(), "Store health check failed");
    }

    let engine = AttendanceEngine::load(store, &settings)
        .context("Failed to load attendance records")?;

    let fence = engine.geofence();
    info!(
        office_lat = fence.center().lat,
        office_lng = fence.center().lng,
        radius_meters = fence.radius_meters(),
        "Geofence ready"
    );

    let engine = engine.into_shared();

    let output = execute(args.command, engine, &settings).await?;
    println!("{}", serde_json::to_string_pretty(&output.value)?);

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}
