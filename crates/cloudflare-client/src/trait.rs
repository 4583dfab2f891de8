//! CloudflareClient trait for mocking
//!
//! This trait abstracts the CloudflareClient to enable mocking in unit tests.
//! The concrete CloudflareClient implements this trait, and tests can use mock implementations.

use crate::error::CloudflareError;
use crate::models::*;

/// Trait for Cloudflare API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait CloudflareClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    // Account operations
    async fn get_account(&self, id: &str) -> Result<Account, CloudflareError>;
    async fn update_account(&self, id: &str, update: &AccountUpdate) -> Result<Account, CloudflareError>;
}
