//! InvocationRequest - handler input
//!
//! Transport-agnostic view of the inbound HTTP call, built by the host.

use std::collections::HashMap;

/// Inbound request as seen by the handler
#[derive(Debug, Clone, Default)]
pub struct InvocationRequest {
    /// Host-assigned invocation id (also sent back as `X-Request-Id`)
    pub invocation_id: String,
    /// HTTP method, upper case
    pub method: String,
    /// Request path and query
    pub uri: String,
    /// Request headers (lower-cased names)
    pub headers: HashMap<String, String>,
}

impl InvocationRequest {
    /// Create a GET request for `uri`
    pub fn get(invocation_id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            method: "GET".to_string(),
            uri: uri.into(),
            headers: HashMap::new(),
        }
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
