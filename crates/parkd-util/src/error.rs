//! Error types for parkd

use thiserror::Error;

use crate::{CarId, SpotId, UserId};

/// Core error type for parkd operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParkError {
    #[error("User not found.")]
    UserNotFound(UserId),

    #[error("Car not found.")]
    CarNotFound(CarId),

    #[error("Parking spot not found.")]
    SpotNotFound(SpotId),

    #[error("Parking spot is not available.")]
    SpotUnavailable { spot_id: SpotId, occupied_by: Option<CarId> },

    #[error("Car is not currently parked.")]
    CarNotParked(CarId),

    #[error("Car is already parked.")]
    CarAlreadyParked { car_id: CarId, spot_id: SpotId },

    #[error("Failed to register the car.")]
    CarIdTaken(CarId),

    #[error("No parking period found for this car.")]
    NoParkingPeriod(CarId),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Broad classification of a [`ParkError`], used by the request layer
/// to pick a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity does not exist
    NotFound,
    /// The request is well-formed but conflicts with current state
    Conflict,
    /// No closed parking session has been recorded yet
    NoActiveData,
    /// Something went wrong inside the service
    Internal,
}

impl ParkError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParkError::UserNotFound(_) | ParkError::CarNotFound(_) | ParkError::SpotNotFound(_) => {
                ErrorKind::NotFound
            }
            ParkError::SpotUnavailable { .. }
            | ParkError::CarNotParked(_)
            | ParkError::CarAlreadyParked { .. }
            | ParkError::CarIdTaken(_) => ErrorKind::Conflict,
            ParkError::NoParkingPeriod(_) => ErrorKind::NoActiveData,
            ParkError::StoreError(_) | ParkError::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert_eq!(ParkError::CarNotFound(CarId::new(1)).kind(), ErrorKind::NotFound);
        assert_eq!(ParkError::SpotNotFound(SpotId::new(1)).kind(), ErrorKind::NotFound);
        assert_eq!(
            ParkError::SpotUnavailable {
                spot_id: SpotId::new(1),
                occupied_by: Some(CarId::new(2)),
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(ParkError::CarNotParked(CarId::new(1)).kind(), ErrorKind::Conflict);
        assert_eq!(ParkError::NoParkingPeriod(CarId::new(1)).kind(), ErrorKind::NoActiveData);
        assert_eq!(ParkError::store("poisoned").kind(), ErrorKind::Internal);
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(ParkError::CarNotFound(CarId::new(7)).to_string(), "Car not found.");
        assert_eq!(
            ParkError::NoParkingPeriod(CarId::new(7)).to_string(),
            "No parking period found for this car."
        );
    }
}
