//! Entity and view types shared by the ledger, the store and clients

use chrono::{DateTime, Local};
use parkd_util::{CarId, SpotId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A registered car and its current (or most recent) parking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub car_id: CarId,
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub owner_id: UserId,
    pub is_parked: bool,
    pub parking_spot_id: Option<SpotId>,
    pub parking_start_time: Option<DateTime<Local>>,
    pub parking_end_time: Option<DateTime<Local>>,
}

impl Car {
    /// A freshly registered car that has never parked
    pub fn unparked(car_id: CarId, details: NewCar) -> Self {
        Self {
            car_id,
            license_plate: details.license_plate,
            make: details.make,
            model: details.model,
            owner_id: details.owner_id,
            is_parked: false,
            parking_spot_id: None,
            parking_start_time: None,
            parking_end_time: None,
        }
    }

    /// Start and end of the last closed session, if both are recorded
    pub fn closed_period(&self) -> Option<(DateTime<Local>, DateTime<Local>)> {
        match (self.parking_start_time, self.parking_end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// A parking spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub parking_spot_id: SpotId,
    pub spot_number: String,
    pub is_available: bool,
    pub car_id: Option<CarId>,
    pub occupied_since: Option<DateTime<Local>>,
}

impl ParkingSpot {
    /// An empty spot
    pub fn vacant(parking_spot_id: SpotId, spot_number: impl Into<String>) -> Self {
        Self {
            parking_spot_id,
            spot_number: spot_number.into(),
            is_available: true,
            car_id: None,
            occupied_since: None,
        }
    }
}

/// Car registration payload. No field is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCar {
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub owner_id: UserId,
}

/// Confirmation that a car has started parking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    pub car_id: CarId,
    pub parking_spot_id: SpotId,
    pub license_plate: String,
    pub spot_number: String,
    pub started_at: DateTime<Local>,
}

/// Summary returned when a parking session ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReceipt {
    pub car_id: CarId,
    pub license_plate: String,
    pub spot_number: String,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    /// Full precision; round for display with `parkd_util::format_hours`
    pub duration_hours: Decimal,
    pub total_cost: Decimal,
}

/// The last closed parking period of a car
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingPeriod {
    pub car_id: CarId,
    pub license_plate: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub duration_hours: Decimal,
}

/// The cost of the last closed parking period of a car
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingCost {
    pub car_id: CarId,
    pub license_plate: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub total_cost: Decimal,
}

/// One row of a user's parking history.
///
/// Cars keep a single session slot, so each car contributes exactly one row
/// describing its most recent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingHistoryEntry {
    pub car_id: CarId,
    pub license_plate: String,
    pub parking_start_time: Option<DateTime<Local>>,
    pub parking_end_time: Option<DateTime<Local>>,
    pub total_cost: Decimal,
}

/// Everything registered under a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cars: Vec<Car>,
    pub parking_history: Vec<ParkingHistoryEntry>,
}

/// Health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub live: bool,
    pub ready: bool,
    pub store_ok: bool,
    pub mock_time: bool,
}
