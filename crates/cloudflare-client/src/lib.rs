//! Cloudflare REST API Client
//!
//! A Rust client library for the parts of the Cloudflare v4 API the provider
//! reconciles. Provides type-safe models and an object-safe trait so
//! controllers can swap in a mock.
//!
//! # Example
//!
//! ```no_run
//! use cloudflare_client::{AccountSettings, AccountUpdate, CloudflareClient, DEFAULT_BASE_URL};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CloudflareClient::new(
//!     DEFAULT_BASE_URL.to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! let account = client.get_account("023e105f4ecef8ad9ca31a8372d0c353").await?;
//!
//! let update = AccountUpdate {
//!     name: account.name.clone(),
//!     settings: AccountSettings { enforce_two_factor: true },
//! };
//! client.update_account(&account.id, &update).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod cloudflare_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{CloudflareClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use common::HttpClient;
pub use error::CloudflareError;
pub use models::*;
pub use cloudflare_trait::CloudflareClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockCloudflareClient};
