//! Validated configuration ready for the service

use crate::schema::{RawCar, RawConfig, RawLedgerConfig, RawServiceConfig, RawSpot, RawUser};
use parkd_api::{Car, NewCar, ParkingSpot, User};
use parkd_util::{CarId, SpotId, UserId, socket_path_without_env};
use std::path::PathBuf;

/// Default number of audit events kept in memory
pub const DEFAULT_AUDIT_CAPACITY: usize = 1024;

/// Validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub ledger: LedgerConfig,
    pub seed: Seed,
}

impl Config {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            service: ServiceConfig::from_raw(raw.service),
            ledger: LedgerConfig::from_raw(raw.ledger),
            seed: Seed {
                users: raw.users.into_iter().map(convert_user).collect(),
                cars: raw.cars.into_iter().map(convert_car).collect(),
                spots: raw.spots.into_iter().map(convert_spot).collect(),
            },
        }
    }

    /// Configuration used when no config file is present: one user with
    /// one car, and a single free spot.
    pub fn builtin() -> Self {
        Self {
            service: ServiceConfig::default(),
            ledger: LedgerConfig::default(),
            seed: Seed::builtin(),
        }
    }
}

/// Service-level settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub socket_path: PathBuf,
    pub audit_capacity: usize,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        Self {
            socket_path: raw.socket_path.unwrap_or_else(socket_path_without_env),
            audit_capacity: raw.audit_capacity.unwrap_or(DEFAULT_AUDIT_CAPACITY),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_raw(RawServiceConfig::default())
    }
}

/// Ledger behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    /// When false (the default), a new session leaves the previous
    /// session's end time in place until the next exit overwrites it.
    pub clear_session_end_on_begin: bool,

    /// When false (the default), ending a session clears the start time,
    /// leaving only the end time on the car.
    pub keep_session_start_on_exit: bool,
}

impl LedgerConfig {
    fn from_raw(raw: RawLedgerConfig) -> Self {
        Self {
            clear_session_end_on_begin: raw.clear_session_end_on_begin,
            keep_session_start_on_exit: raw.keep_session_start_on_exit,
        }
    }
}

/// Initial entities loaded into the store at startup
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub users: Vec<User>,
    pub cars: Vec<Car>,
    pub spots: Vec<ParkingSpot>,
}

impl Seed {
    pub fn builtin() -> Self {
        Self {
            users: vec![User {
                user_id: UserId::new(1),
                first_name: "John".into(),
                last_name: "Doe".into(),
                email: "john.doe@example.com".into(),
            }],
            cars: vec![Car::unparked(
                CarId::new(1),
                NewCar {
                    license_plate: "ABC123".into(),
                    make: "Toyota".into(),
                    model: "Camry".into(),
                    owner_id: UserId::new(1),
                },
            )],
            spots: vec![ParkingSpot::vacant(SpotId::new(1), "A1")],
        }
    }
}

fn convert_user(raw: RawUser) -> User {
    User {
        user_id: UserId::new(raw.id),
        first_name: raw.first_name,
        last_name: raw.last_name,
        email: raw.email,
    }
}

fn convert_car(raw: RawCar) -> Car {
    Car::unparked(
        CarId::new(raw.id),
        NewCar {
            license_plate: raw.license_plate,
            make: raw.make,
            model: raw.model,
            owner_id: UserId::new(raw.owner_id),
        },
    )
}

fn convert_spot(raw: RawSpot) -> ParkingSpot {
    ParkingSpot::vacant(SpotId::new(raw.id), raw.number)
}
