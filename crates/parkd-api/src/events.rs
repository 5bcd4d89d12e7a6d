//! Event types for parkd -> client streaming

use chrono::{DateTime, Local};
use parkd_util::{CarId, SpotId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::API_VERSION;

/// Event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub api_version: u32,
    pub timestamp: DateTime<Local>,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            api_version: API_VERSION,
            timestamp: parkd_util::now(),
            payload,
        }
    }
}

/// All possible events from the service to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    CarRegistered {
        car_id: CarId,
        owner_id: UserId,
        license_plate: String,
    },

    /// A spot became occupied
    SessionStarted {
        car_id: CarId,
        parking_spot_id: SpotId,
        started_at: DateTime<Local>,
    },

    /// A spot was released
    SessionEnded {
        car_id: CarId,
        parking_spot_id: SpotId,
        ended_at: DateTime<Local>,
        total_cost: Decimal,
    },

    /// Service is shutting down
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn event_serialization() {
        let event = Event::new(EventPayload::SessionEnded {
            car_id: CarId::new(2),
            parking_spot_id: SpotId::new(1),
            ended_at: parkd_util::now(),
            total_cost: dec!(28),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"session_ended""#));

        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_version, API_VERSION);
        match parsed.payload {
            EventPayload::SessionEnded { total_cost, .. } => assert_eq!(total_cost, dec!(28)),
            other => panic!("Expected SessionEnded, got {other:?}"),
        }
    }
}
