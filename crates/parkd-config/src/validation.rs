//! Configuration validation

use crate::schema::RawConfig;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Duplicate user ID: {0}")]
    DuplicateUserId(u32),

    #[error("Duplicate car ID: {0}")]
    DuplicateCarId(u32),

    #[error("Duplicate spot ID: {0}")]
    DuplicateSpotId(u32),

    #[error("{entity} ID must be greater than zero")]
    ZeroId { entity: &'static str },

    #[error("Spot {spot_id}: spot number cannot be empty")]
    EmptySpotNumber { spot_id: u32 },

    #[error("Service config error: {0}")]
    ServiceError(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.service.audit_capacity == Some(0) {
        errors.push(ValidationError::ServiceError(
            "audit_capacity must be at least 1".into(),
        ));
    }

    errors.extend(check_ids(
        config.users.iter().map(|u| u.id),
        "User",
        ValidationError::DuplicateUserId,
    ));
    errors.extend(check_ids(
        config.cars.iter().map(|c| c.id),
        "Car",
        ValidationError::DuplicateCarId,
    ));
    errors.extend(check_ids(
        config.spots.iter().map(|s| s.id),
        "Spot",
        ValidationError::DuplicateSpotId,
    ));

    for spot in &config.spots {
        if spot.number.trim().is_empty() {
            errors.push(ValidationError::EmptySpotNumber { spot_id: spot.id });
        }
    }

    // Car owners are not checked against users, same as registration

    errors
}

fn check_ids(
    ids: impl Iterator<Item = u32>,
    entity: &'static str,
    duplicate: fn(u32) -> ValidationError,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut reported_zero = false;

    for id in ids {
        if id == 0 && !reported_zero {
            errors.push(ValidationError::ZeroId { entity });
            reported_zero = true;
        }
        if !seen.insert(id) {
            errors.push(duplicate(id));
        }
    }

    errors
}
