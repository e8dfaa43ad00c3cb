//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Sink write error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Failure while computing one invocation
///
/// Never leaves `ResultAggregator::handle`; converted to the 500 reply there.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// Record could not be synthesized
    #[error("record synthesis failed: {0}")]
    Synthesis(#[source] contracts::ContractError),

    /// A reply body or sink payload could not be encoded
    #[error("failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl InvocationError {
    /// Create a serialization error
    pub fn serialization(what: &'static str, source: serde_json::Error) -> Self {
        Self::Serialization { what, source }
    }
}
