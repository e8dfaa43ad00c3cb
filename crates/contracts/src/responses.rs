//! Reply bodies
//!
//! JSON shapes of the success and failure replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static greeting carried by every success reply
pub const WELCOME_MESSAGE: &str = "Welcome to Azure Functions!";

/// Success reply body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeResponse {
    pub message: String,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub function_message: String,
}

/// Failure reply body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
