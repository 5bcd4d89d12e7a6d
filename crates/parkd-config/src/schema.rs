//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Ledger behaviour
    #[serde(default)]
    pub ledger: RawLedgerConfig,

    #[serde(default)]
    pub users: Vec<RawUser>,

    #[serde(default)]
    pub cars: Vec<RawCar>,

    #[serde(default)]
    pub spots: Vec<RawSpot>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// IPC socket path
    pub socket_path: Option<PathBuf>,

    /// Maximum number of audit events kept in memory
    pub audit_capacity: Option<usize>,
}

/// Ledger behaviour switches
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLedgerConfig {
    /// Clear a car's previous end time when it starts a new session
    #[serde(default)]
    pub clear_session_end_on_begin: bool,

    /// Keep a car's start time when its session ends, so the closed
    /// period stays queryable
    #[serde(default)]
    pub keep_session_start_on_exit: bool,
}

/// Seed user
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawUser {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Seed car
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawCar {
    pub id: u32,
    pub license_plate: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    pub owner_id: u32,
}

/// Seed parking spot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSpot {
    pub id: u32,
    /// Human-readable spot number, e.g. "A1"
    pub number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_seed() {
        let toml_str = r#"
            config_version = 1

            [service]
            socket_path = "/tmp/parkd-test/parkd.sock"
            audit_capacity = 16

            [[users]]
            id = 1
            first_name = "John"
            last_name = "Doe"
            email = "john.doe@example.com"

            [[cars]]
            id = 1
            license_plate = "ABC123"
            make = "Toyota"
            model = "Camry"
            owner_id = 1

            [[spots]]
            id = 1
            number = "A1"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.audit_capacity, Some(16));
        assert_eq!(config.cars[0].license_plate, "ABC123");
        assert_eq!(config.spots[0].number, "A1");
        assert!(!config.ledger.clear_session_end_on_begin);
        assert!(!config.ledger.keep_session_start_on_exit);
    }

    #[test]
    fn car_make_and_model_are_optional() {
        let toml_str = r#"
            config_version = 1

            [[cars]]
            id = 4
            license_plate = "NOMAKE"
            owner_id = 1
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert!(config.cars[0].make.is_empty());
    }
}
