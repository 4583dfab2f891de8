//! Mock CloudflareClient for unit testing
//!
//! This module provides a mock implementation of CloudflareClientTrait that can be used
//! in unit tests without network access.
//!
//! - `accounts.rs` - account operations backed by an in-memory store
//!
//! Every trait call is recorded so tests can assert on exactly which requests
//! a reconciler issued (or that it issued none).

mod accounts;

use crate::error::CloudflareError;
use crate::models::*;
use crate::cloudflare_trait::CloudflareClientTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A request observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetAccount(String),
    UpdateAccount(String, AccountUpdate),
}

/// Mock CloudflareClient for testing
///
/// Clones share state, so a test can keep a handle while the code under test
/// owns a boxed copy.
#[derive(Clone)]
pub struct MockCloudflareClient {
    pub(crate) base_url: String,
    pub(crate) accounts: Arc<Mutex<HashMap<String, Account>>>,
    pub(crate) calls: Arc<Mutex<Vec<MockCall>>>,
    // One-shot injected failures
    pub(crate) get_failure: Arc<Mutex<Option<CloudflareError>>>,
    pub(crate) update_failure: Arc<Mutex<Option<CloudflareError>>>,
}

impl MockCloudflareClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            accounts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            get_failure: Arc::new(Mutex::new(None)),
            update_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Add an account to the mock store (for test setup)
    pub fn add_account(&self, account: Account) {
        self.accounts.lock().unwrap().insert(account.id.clone(), account);
    }

    /// Read back an account from the mock store
    pub fn account(&self, id: &str) -> Option<Account> {
        self.accounts.lock().unwrap().get(id).cloned()
    }

    /// Make the next `get_account` call fail with `error`
    pub fn fail_next_get(&self, error: CloudflareError) {
        *self.get_failure.lock().unwrap() = Some(error);
    }

    /// Make the next `update_account` call fail with `error`
    pub fn fail_next_update(&self, error: CloudflareError) {
        *self.update_failure.lock().unwrap() = Some(error);
    }

    /// All calls recorded so far, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls recorded so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl CloudflareClientTrait for MockCloudflareClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_account(&self, id: &str) -> Result<Account, CloudflareError> {
        accounts::get_account(self, id).await
    }

    async fn update_account(&self, id: &str, update: &AccountUpdate) -> Result<Account, CloudflareError> {
        accounts::update_account(self, id, update).await
    }
}
