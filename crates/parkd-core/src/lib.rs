//! Core session ledger and cost calculator for parkd
//!
//! This crate is the heart of parkd, containing:
//! - The session ledger (register cars, begin and end parking sessions)
//! - Read views over cars, spots and users
//! - Time-banded tariff evaluation in exact decimal arithmetic

mod events;
mod ledger;
mod tariff;

pub use events::*;
pub use ledger::*;
pub use tariff::*;
