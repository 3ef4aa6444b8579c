//! Config validation CLI tool
//!
//! Validates a punchclock configuration file and reports any errors.

use punchclock_config::{AttendancePolicy, CorruptStatePolicy, SeedPolicy};
use punchclock_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a punchclock configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match punchclock_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", punchclock_config::CURRENT_CONFIG_VERSION);
            println!("  Data dir: {}", settings.service.data_dir.display());

            let fence = &settings.geofence;
            if fence.enabled {
                println!(
                    "  Geofence: {:.0} m around ({}, {})",
                    fence.radius_meters, fence.office.lat, fence.office.lng
                );
            } else {
                println!("  Geofence: disabled");
            }

            println!("  Attendance: {}", describe_attendance(&settings.attendance));
            println!(
                "  Location timeout: {} ms",
                settings.location.timeout.as_millis()
            );

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                punchclock_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                punchclock_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                punchclock_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                punchclock_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        punchclock_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}

fn describe_attendance(policy: &AttendancePolicy) -> String {
    let punch_out = if policy.strict_punch_out {
        "strict punch-out"
    } else {
        "lenient punch-out"
    };
    let corrupt = match policy.on_corrupt_state {
        CorruptStatePolicy::Fail => "fail on corrupt state",
        CorruptStatePolicy::Seed => "reseed on corrupt state",
    };
    let seed = match policy.seed {
        SeedPolicy::Builtin => "builtin seed",
        SeedPolicy::Empty => "empty seed",
    };
    format!("{}, {}, {}", punch_out, corrupt, seed)
}
