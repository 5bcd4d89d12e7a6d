//! parkd - The parking session service
//!
//! Wires together all the components:
//! - Configuration loading (or the built-in seed)
//! - Store initialization
//! - Session ledger
//! - IPC server and command dispatch

mod commands;
mod service;

pub use commands::*;
pub use service::*;
