//! Storage layer for parkd
//!
//! Provides:
//! - Entity tables (users, cars, parking spots) behind a single lock
//! - Serializable transactions over those tables
//! - Audit log (append-only, bounded)

mod audit;
mod memory;
mod tables;
mod traits;

pub use audit::*;
pub use memory::*;
pub use tables::*;
pub use traits::*;

use parkd_util::ParkError;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Transaction closure was not run")]
    Aborted,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<StoreError> for ParkError {
    fn from(e: StoreError) -> Self {
        ParkError::store(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
