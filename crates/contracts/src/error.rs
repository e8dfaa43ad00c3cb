//! Layered error definitions
//!
//! Categorized by source: config / synthesis / serialization / sink

use thiserror::Error;

use crate::OutputKind;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Synthesis Errors =====
    /// Identifier generator failed
    #[error("id generation error: {message}")]
    IdGeneration { message: String },

    /// Record field invariant violated
    #[error("invalid record field '{field}': {message}")]
    InvalidRecord { field: String, message: String },

    /// Encoding a record or reply failed
    #[error("serialization error for {context}: {message}")]
    Serialization { context: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    /// Sink connection error
    #[error("sink '{sink_name}' connection error: {message}")]
    SinkConnection { sink_name: String, message: String },

    /// Payload routed to a sink bound to another kind
    #[error("sink '{sink_name}' accepts {expected} outputs, got {actual}")]
    UnsupportedOutput {
        sink_name: String,
        expected: OutputKind,
        actual: OutputKind,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create id generation error
    pub fn id_generation(message: impl Into<String>) -> Self {
        Self::IdGeneration {
            message: message.into(),
        }
    }

    /// Create invalid record error
    pub fn invalid_record(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create unsupported output error
    pub fn unsupported_output(
        sink_name: impl Into<String>,
        expected: OutputKind,
        actual: OutputKind,
    ) -> Self {
        Self::UnsupportedOutput {
            sink_name: sink_name.into(),
            expected,
            actual,
        }
    }
}
