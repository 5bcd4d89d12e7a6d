//! In-memory store implementation

use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::{AuditEvent, Store, StoreError, StoreResult, Tables};

struct AuditLog {
    entries: VecDeque<AuditEvent>,
    next_id: u64,
}

/// Store holding every table behind a single lock.
///
/// State lives for the lifetime of the process. The audit log keeps at most
/// `audit_capacity` events and drops the oldest first.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    audit: Mutex<AuditLog>,
    audit_capacity: usize,
}

impl MemoryStore {
    pub fn new(audit_capacity: usize) -> Self {
        Self::from_tables(Tables::default(), audit_capacity)
    }

    pub fn from_tables(tables: Tables, audit_capacity: usize) -> Self {
        let audit_capacity = audit_capacity.max(1);
        debug!(audit_capacity, "Memory store initialized");
        Self {
            tables: Mutex::new(tables),
            audit: Mutex::new(AuditLog {
                entries: VecDeque::with_capacity(audit_capacity.min(1024)),
                next_id: 1,
            }),
            audit_capacity,
        }
    }
}

impl Store for MemoryStore {
    fn transaction(&self, f: &mut dyn FnMut(&mut Tables)) -> StoreResult<()> {
        let mut tables = self.tables.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut tables);
        Ok(())
    }

    fn append_audit(&self, mut event: AuditEvent) -> StoreResult<()> {
        let mut log = self.audit.lock().map_err(|_| StoreError::LockPoisoned)?;

        event.id = log.next_id;
        log.next_id += 1;

        if log.entries.len() >= self.audit_capacity {
            log.entries.pop_front();
        }
        debug!(event_id = event.id, "Audit event appended");
        log.entries.push_back(event);
        Ok(())
    }

    fn get_recent_audits(&self, limit: usize) -> StoreResult<Vec<AuditEvent>> {
        let log = self.audit.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(log.entries.iter().rev().take(limit).cloned().collect())
    }

    fn is_healthy(&self) -> bool {
        let healthy = !self.tables.is_poisoned() && !self.audit.is_poisoned();
        if !healthy {
            warn!("Store lock poisoned");
        }
        healthy
    }
}
