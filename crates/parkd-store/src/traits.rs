//! Store trait definitions

use crate::{AuditEvent, StoreError, StoreResult, Tables};

/// Main store trait
pub trait Store: Send + Sync {
    // Entities

    /// Run `f` with exclusive access to the entity tables.
    ///
    /// No other transaction observes the tables while `f` runs. Callers
    /// perform every check before the first mutation so a failed
    /// operation leaves the tables untouched.
    fn transaction(&self, f: &mut dyn FnMut(&mut Tables)) -> StoreResult<()>;

    // Audit log

    /// Append an audit event
    fn append_audit(&self, event: AuditEvent) -> StoreResult<()>;

    /// Get recent audit events, newest first
    fn get_recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

/// Typed convenience over [`Store::transaction`]
pub trait StoreExt: Store {
    /// Run `f` inside a transaction and hand back its result
    fn with_tables<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> StoreResult<R> {
        let mut f = Some(f);
        let mut out = None;
        self.transaction(&mut |tables| {
            if let Some(f) = f.take() {
                out = Some(f(tables));
            }
        })?;
        out.ok_or(StoreError::Aborted)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
