//! Data Transfer Objects for the HTTP API.
//!
//! Contribution bodies are the [`crate::api`] types themselves; this module
//! only holds the service-level responses.

use serde::{Deserialize, Serialize};

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Registered handler names
    pub handlers: Vec<String>,
}
