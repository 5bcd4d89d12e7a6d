//! Shared utilities for parkd
//!
//! This crate provides:
//! - ID types (UserId, CarId, SpotId, ClientId)
//! - Wall-clock time with a mock-time override for development
//! - Money and duration display helpers
//! - Error types
//! - Rate limiting helpers
//! - Default paths for the socket and config file

mod error;
mod ids;
mod money;
mod paths;
mod rate_limit;
mod time;

pub use error::*;
pub use ids::*;
pub use money::*;
pub use paths::*;
pub use rate_limit::*;
pub use time::*;
