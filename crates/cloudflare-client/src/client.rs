//! Cloudflare API client
//!
//! Implements the Cloudflare v4 REST API client for account operations.
//! Based on the v4 API structure: /accounts/{account_id}

use crate::common::HttpClient;
use crate::error::CloudflareError;
use crate::models::*;
use crate::cloudflare_trait::CloudflareClientTrait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default Cloudflare v4 API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare API client
#[derive(Debug)]
pub struct CloudflareClient {
    http: HttpClient,
}

impl CloudflareClient {
    /// Create a new Cloudflare client
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g., "https://api.cloudflare.com/client/v4")
    /// * `token` - API token for bearer authentication
    pub fn new(base_url: String, token: String) -> Result<Self, CloudflareError> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a new Cloudflare client with an explicit request timeout
    pub fn with_timeout(
        base_url: String,
        token: String,
        timeout: Duration,
    ) -> Result<Self, CloudflareError> {
        if token.trim().is_empty() {
            return Err(CloudflareError::InvalidRequest(
                "API token must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CloudflareError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, token),
        })
    }

    /// Create a client from raw credential bytes (an API token)
    ///
    /// Surrounding whitespace is stripped since tokens read from Secrets or
    /// files commonly end with a newline.
    pub fn from_credentials(
        base_url: String,
        creds: &[u8],
        timeout: Duration,
    ) -> Result<Self, CloudflareError> {
        let token = std::str::from_utf8(creds).map_err(|e| {
            CloudflareError::InvalidRequest(format!("API token is not valid UTF-8: {}", e))
        })?;
        Self::with_timeout(base_url, token.trim().to_string(), timeout)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Get an account by ID
    ///
    /// # Arguments
    /// * `id` - Account identifier
    ///
    /// # Returns
    /// * `Ok(Account)` - The account object
    /// * `Err(CloudflareError)` - If the request fails
    pub async fn get_account(&self, id: &str) -> Result<Account, CloudflareError> {
        let path = Self::account_path(id)?;
        debug!("Fetching account {} from Cloudflare", id);
        self.http.get(&path).await
    }

    /// Update an account's mutable fields
    ///
    /// # Arguments
    /// * `id` - Account identifier
    /// * `update` - Full set of mutable fields to send
    ///
    /// # Returns
    /// * `Ok(Account)` - The account as stored after the update
    /// * `Err(CloudflareError)` - If the request fails
    pub async fn update_account(
        &self,
        id: &str,
        update: &AccountUpdate,
    ) -> Result<Account, CloudflareError> {
        let path = Self::account_path(id)?;
        debug!("Updating account {} in Cloudflare", id);
        self.http.put(&path, update).await
    }

    fn account_path(id: &str) -> Result<String, CloudflareError> {
        if id.is_empty() {
            return Err(CloudflareError::InvalidRequest(
                "account ID must not be empty".to_string(),
            ));
        }
        Ok(format!("/accounts/{}", urlencoding::encode(id)))
    }
}

#[async_trait::async_trait]
impl CloudflareClientTrait for CloudflareClient {
    fn base_url(&self) -> &str {
        CloudflareClient::base_url(self)
    }

    async fn get_account(&self, id: &str) -> Result<Account, CloudflareError> {
        CloudflareClient::get_account(self, id).await
    }

    async fn update_account(
        &self,
        id: &str,
        update: &AccountUpdate,
    ) -> Result<Account, CloudflareError> {
        CloudflareClient::update_account(self, id, update).await
    }
}
