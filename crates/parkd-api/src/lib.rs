//! Protocol types for parkd IPC
//!
//! This crate defines the stable API between parkd and its clients:
//! - Entity types (users, cars, parking spots) and read views
//! - Commands (requests from clients) and responses
//! - Events (service -> subscribed clients)
//! - Versioning

mod commands;
mod events;
mod types;

pub use commands::*;
pub use events::*;
pub use types::*;

/// Current API version
pub const API_VERSION: u32 = 1;
