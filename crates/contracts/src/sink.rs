//! OutputSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for sinks and the payloads they accept.

use serde::{Deserialize, Serialize};

use crate::{ContractError, Record};

/// Which aggregate field a sink is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Record written to a document store
    Document,
    /// Serialized record written to a blob store
    Blob,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Blob => write!(f, "blob"),
        }
    }
}

/// One payload handed to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutput {
    /// Record keyed by id, sharded by partition key
    Document(Record),
    /// Blob content; the sink assigns the blob name
    Blob(String),
}

impl SinkOutput {
    /// Binding kind of this payload
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Document(_) => OutputKind::Document,
            Self::Blob(_) => OutputKind::Blob,
        }
    }
}

/// Output sink trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(OutputSink: Send)]
pub trait LocalOutputSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Binding kind this sink accepts
    fn kind(&self) -> OutputKind;

    /// Write one payload
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, output: &SinkOutput) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
