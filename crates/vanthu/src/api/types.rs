//! API request and response types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ingest::IngestService;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<IngestService>,
}

/// Size limits applied at the router layer.
#[derive(Debug, Clone, Copy)]
pub struct ApiSizeLimits {
    /// Maximum request body size in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 100 * 1024 * 1024,
        }
    }
}

impl ApiSizeLimits {
    pub fn from_mb(max_request_body_mb: usize) -> Self {
        Self {
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
        }
    }
}

/// Body of `POST /delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "fileId")]
    pub file_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Body of `POST /read`.
#[derive(Debug, Deserialize)]
pub struct ReadRequest {
    #[serde(rename = "fileId")]
    pub file_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadResponse {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error payload returned for every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub status_code: u16,
}
