//! Ambient collaborators consumed by value
//!
//! The clock and the identifier source are injected so the core stays
//! deterministic under test.

use chrono::{DateTime, Utc};

use crate::ContractError;

/// Source of the current UTC instant
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current wall-clock time
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Source of globally unique identifiers
///
/// Shared process-wide; implementations must be thread safe.
pub trait IdGenerator: Send + Sync + std::fmt::Debug {
    /// Produce a fresh identifier
    ///
    /// # Errors
    /// Returns `IdGeneration` if no identifier could be produced.
    fn next_id(&self) -> Result<String, ContractError>;
}
