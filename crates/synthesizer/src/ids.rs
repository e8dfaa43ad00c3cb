//! Identifier generators

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{ContractError, IdGenerator};
use uuid::Uuid;

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> Result<String, ContractError> {
        Ok(Uuid::new_v4().to_string())
    }
}

/// Predictable `<prefix>-<n>` identifiers, starting at 1
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Result<String, ContractError> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(format!("{}-{}", self.prefix, n))
    }
}
