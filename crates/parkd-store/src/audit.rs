//! Audit event types

use chrono::{DateTime, Local};
use parkd_api::AuditRecord;
use parkd_util::{CarId, SpotId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::StoreResult;

/// Types of audit events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// Service started
    ServiceStarted,

    /// Service stopped
    ServiceStopped,

    /// Seed data loaded into the store
    SeedLoaded {
        users: usize,
        cars: usize,
        spots: usize,
    },

    CarRegistered {
        car_id: CarId,
        owner_id: UserId,
        license_plate: String,
    },

    SessionStarted {
        car_id: CarId,
        parking_spot_id: SpotId,
        started_at: DateTime<Local>,
    },

    SessionEnded {
        car_id: CarId,
        parking_spot_id: SpotId,
        started_at: DateTime<Local>,
        ended_at: DateTime<Local>,
        total_cost: Decimal,
    },

    ClientConnected { client_id: String },

    ClientDisconnected { client_id: String },
}

/// Full audit event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID
    pub id: u64,

    /// Event timestamp
    pub timestamp: DateTime<Local>,

    /// Event type and details
    pub event: AuditEventType,
}

impl AuditEvent {
    pub fn new(event: AuditEventType) -> Self {
        Self {
            id: 0, // Will be set by store
            timestamp: parkd_util::now(),
            event,
        }
    }

    /// Flatten into the protocol representation: the serde tag becomes
    /// `event_type` and the remaining fields become `details`.
    pub fn to_record(&self) -> StoreResult<AuditRecord> {
        let mut details = serde_json::to_value(&self.event)?;
        let event_type = details
            .as_object_mut()
            .and_then(|obj| obj.remove("type"))
            .and_then(|tag| tag.as_str().map(str::to_owned))
            .unwrap_or_default();

        Ok(AuditRecord {
            id: self.id,
            timestamp: self.timestamp,
            event_type,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_splits_tag_from_details() {
        let now = parkd_util::now();
        let mut event = AuditEvent::new(AuditEventType::SessionEnded {
            car_id: CarId::new(1),
            parking_spot_id: SpotId::new(2),
            started_at: now,
            ended_at: now,
            total_cost: dec!(6.67),
        });
        event.id = 12;

        let record = event.to_record().unwrap();
        assert_eq!(record.id, 12);
        assert_eq!(record.event_type, "session_ended");
        assert_eq!(record.details["car_id"], 1);
        assert_eq!(record.details["total_cost"], "6.67");
        assert!(record.details.get("type").is_none());
    }

    #[test]
    fn unit_variant_has_empty_details() {
        let record = AuditEvent::new(AuditEventType::ServiceStarted).to_record().unwrap();
        assert_eq!(record.event_type, "service_started");
        assert_eq!(record.details, serde_json::json!({}));
    }
}
