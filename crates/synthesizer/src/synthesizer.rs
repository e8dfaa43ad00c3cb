//! RecordSynthesizer - builds the domain record

use std::sync::Arc;

use chrono::{DateTime, Utc};
use contracts::{ContractError, IdGenerator, Record, DEFAULT_PARTITION_KEY};
use tracing::{debug, instrument};

/// Payload message embedded in every record
pub fn function_message(now: DateTime<Utc>) -> String {
    format!("Function executed at {}", now.format("%Y-%m-%d %H:%M:%S%.3f UTC"))
}

/// Builds records from an identifier source and a fixed partition key
///
/// Stateless apart from the shared generator; one instance serves every invocation.
#[derive(Debug, Clone)]
pub struct RecordSynthesizer {
    ids: Arc<dyn IdGenerator>,
    partition_key: String,
}

impl RecordSynthesizer {
    /// Create a synthesizer using the default partition key
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            partition_key: DEFAULT_PARTITION_KEY.to_string(),
        }
    }

    /// Override the partition key stamped on records
    pub fn with_partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = partition_key.into();
        self
    }

    /// Partition key stamped on records
    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    /// Synthesize the record for an invocation observed at `now`
    ///
    /// # Errors
    /// Propagates identifier generator failures and record invariant violations.
    #[instrument(name = "synthesize_record", skip(self))]
    pub fn synthesize(&self, now: DateTime<Utc>) -> Result<Record, ContractError> {
        let id = self.ids.next_id()?;
        let record = Record::new(id, self.partition_key.as_str(), now, function_message(now))?;

        debug!(id = %record.id(), partition_key = %record.partition_key(), "Record synthesized");
        Ok(record)
    }
}
