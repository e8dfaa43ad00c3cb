//! FunctionBlueprint - Config Loader output
//!
//! Describes the complete host configuration: the function, the HTTP server and the
//! output bindings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{OutputKind, DEFAULT_PARTITION_KEY};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete host blueprint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FunctionBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// HTTP-triggered function
    #[validate(nested)]
    pub function: FunctionConfig,

    /// HTTP server settings
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// Output bindings
    #[serde(default)]
    #[validate(nested)]
    pub outputs: Vec<SinkConfig>,
}

impl FunctionBlueprint {
    /// Outputs bound to the given aggregate field
    pub fn outputs_for(&self, kind: OutputKind) -> impl Iterator<Item = &SinkConfig> {
        self.outputs.iter().filter(move |o| o.binding == kind)
    }
}

/// Function settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FunctionConfig {
    /// Function name (e.g., "ExampleHttpWithBindingTrigger")
    #[validate(length(min = 1, message = "function name cannot be empty"))]
    pub name: String,

    /// Route override; defaults to `/api/<name>`
    #[serde(default)]
    pub route: Option<String>,

    /// Partition key stamped on every record
    #[serde(default = "default_partition_key")]
    #[validate(length(min = 1, message = "partition key cannot be empty"))]
    pub partition_key: String,
}

impl FunctionConfig {
    /// Effective route of the HTTP trigger
    pub fn route(&self) -> String {
        self.route
            .clone()
            .unwrap_or_else(|| format!("/api/{}", self.name))
    }
}

fn default_partition_key() -> String {
    DEFAULT_PARTITION_KEY.to_string()
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    #[validate(range(min = 1, message = "port must be > 0"))]
    pub port: u16,

    /// Host-side request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1, max = 600, message = "request timeout must be within 1..=600s"))]
    pub request_timeout_secs: u64,

    /// Capacity of the queue between the trigger and the dispatcher
    #[serde(default = "default_output_buffer")]
    #[validate(range(min = 1, message = "output buffer must be > 0"))]
    pub output_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            output_buffer: default_output_buffer(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7071
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_buffer() -> usize {
    1024
}

/// Output binding
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Sink name
    #[validate(length(min = 1, message = "sink name cannot be empty"))]
    pub name: String,

    /// Aggregate field this sink receives
    pub binding: OutputKind,

    /// Sink implementation
    pub sink_type: SinkType,

    /// Queue capacity
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1, message = "queue capacity must be > 0"))]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

/// Sink implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log output
    Log,
    /// File-backed store (document container or blob container)
    File,
}
