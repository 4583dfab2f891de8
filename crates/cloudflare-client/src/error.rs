//! Cloudflare client errors

use thiserror::Error;

/// Errors that can occur when interacting with the Cloudflare API
#[derive(Debug, Error)]
pub enum CloudflareError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cloudflare API returned an error (non-2xx or `success: false`)
    #[error("Cloudflare API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, missing permission, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., empty identifier, malformed token)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
