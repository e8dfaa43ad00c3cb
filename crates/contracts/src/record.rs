//! Record - Synthesizer output
//!
//! The domain entity written to every sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Default partition key assigned to synthesized records.
pub const DEFAULT_PARTITION_KEY: &str = "1";

/// Synthesized domain record
///
/// Immutable once built: fields are private and only readable through accessors.
/// Serialized with the document-store field names (`id`, `partitionKey`,
/// `timestamp`, `message`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: String,
    partition_key: String,
    timestamp: DateTime<Utc>,
    message: String,
}

impl Record {
    /// Build a fully populated record
    ///
    /// # Errors
    /// Returns `InvalidRecord` when `id` or `partition_key` is empty.
    pub fn new(
        id: impl Into<String>,
        partition_key: impl Into<String>,
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Result<Self, ContractError> {
        let id = id.into();
        let partition_key = partition_key.into();

        if id.trim().is_empty() {
            return Err(ContractError::invalid_record("id", "identifier cannot be empty"));
        }
        if partition_key.trim().is_empty() {
            return Err(ContractError::invalid_record(
                "partitionKey",
                "partition key cannot be empty",
            ));
        }

        Ok(Self {
            id,
            partition_key,
            timestamp,
            message: message.into(),
        })
    }

    /// Unique identifier (primary key in the document store)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Logical shard the record belongs to
    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    /// Creation instant
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Free-form payload
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_record_new_populates_fields() {
        let record = Record::new("abc", "1", instant(), "hello").unwrap();
        assert_eq!(record.id(), "abc");
        assert_eq!(record.partition_key(), "1");
        assert_eq!(record.timestamp(), instant());
        assert_eq!(record.message(), "hello");
    }

    #[test]
    fn test_record_rejects_empty_id() {
        let err = Record::new("", "1", instant(), "hello").unwrap_err();
        assert!(matches!(err, ContractError::InvalidRecord { .. }));
    }

    #[test]
    fn test_record_rejects_blank_partition_key() {
        let err = Record::new("abc", "  ", instant(), "hello").unwrap_err();
        assert!(err.to_string().contains("partitionKey"));
    }

    #[test]
    fn test_record_uses_document_field_names() {
        let record = Record::new("abc", "1", instant(), "hello").unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["partitionKey"], "1");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["timestamp"], "2024-05-01T12:30:00Z");
    }
}
