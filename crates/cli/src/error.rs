//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid bind address
    #[error("Invalid bind address {host}:{port}: {message}")]
    BindAddress {
        host: String,
        port: u16,
        message: String,
    },

    /// Sink setup failed
    #[error("Failed to start output sinks: {message}")]
    SinkSetup { message: String },

    /// HTTP host failed while serving
    #[error("HTTP host failed: {message}")]
    Serve { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn bind_address(host: impl Into<String>, port: u16, message: impl Into<String>) -> Self {
        Self::BindAddress {
            host: host.into(),
            port,
            message: message.into(),
        }
    }

    pub fn sink_setup(message: impl Into<String>) -> Self {
        Self::SinkSetup {
            message: message.into(),
        }
    }

    pub fn serve(message: impl Into<String>) -> Self {
        Self::Serve {
            message: message.into(),
        }
    }
}
