//! Core events emitted by the ledger

use chrono::{DateTime, Local};
use parkd_util::{CarId, SpotId, UserId};
use rust_decimal::Decimal;

/// State changes produced by ledger operations
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    CarRegistered {
        car_id: CarId,
        owner_id: UserId,
        license_plate: String,
    },

    /// A car now occupies a spot
    SessionStarted {
        car_id: CarId,
        parking_spot_id: SpotId,
        started_at: DateTime<Local>,
    },

    /// A car left its spot
    SessionEnded {
        car_id: CarId,
        parking_spot_id: SpotId,
        started_at: DateTime<Local>,
        ended_at: DateTime<Local>,
        total_cost: Decimal,
    },
}
