//! Config validation CLI tool
//!
//! Validates a parkd configuration file and summarizes its seed data.

use parkd_util::default_config_path;
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
            eprintln!("Validates a parkd configuration file.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            eprintln!("  validate-config parkd.example.toml");
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match parkd_config::load_config(&config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", parkd_config::CURRENT_CONFIG_VERSION);
            println!("  Socket: {}", config.service.socket_path.display());
            println!("  Audit capacity: {}", config.service.audit_capacity);
            println!(
                "  Clear end time on new session: {}",
                config.ledger.clear_session_end_on_begin
            );
            println!(
                "  Keep start time on exit: {}",
                config.ledger.keep_session_start_on_exit
            );
            println!("  Users: {}", config.seed.users.len());
            println!("  Cars: {}", config.seed.cars.len());
            println!("  Spots: {}", config.seed.spots.len());

            if !config.seed.spots.is_empty() {
                println!();
                println!("Spots:");
                for spot in &config.seed.spots {
                    println!("  - {} [{}]", spot.parking_spot_id, spot.spot_number);
                }
            }

            if !config.seed.cars.is_empty() {
                println!();
                println!("Cars:");
                for car in &config.seed.cars {
                    println!(
                        "  - {} {} {} {} (owner {})",
                        car.car_id, car.license_plate, car.make, car.model, car.owner_id
                    );
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                parkd_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                parkd_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                parkd_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                parkd_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        parkd_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
