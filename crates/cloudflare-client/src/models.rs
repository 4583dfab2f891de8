//! Cloudflare API models
//!
//! These models match the Cloudflare v4 API JSON shapes.
//! See: https://developers.cloudflare.com/api/resources/accounts/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cloudflare v4 response envelope
///
/// Every v4 endpoint wraps its payload in this structure. `result` is absent
/// on most failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ResponseInfo>,
    #[serde(default)]
    pub messages: Vec<ResponseInfo>,
    pub result: Option<T>,
}

/// Error or informational message inside an envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseInfo {
    pub code: i64,
    pub message: String,
}

impl ResponseInfo {
    /// Joins a list of messages into one human-readable line
    pub fn join(infos: &[ResponseInfo]) -> String {
        infos
            .iter()
            .map(|i| format!("{}: {}", i.code, i.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Account as returned by `GET /accounts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Account type, e.g. "standard" or "enterprise"
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AccountSettings>,
}

/// Account-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AccountSettings {
    /// Whether all members must use two-factor authentication
    #[serde(rename = "enforce_twofactor", default)]
    pub enforce_two_factor: bool,
}

/// Mutable account fields sent with `PUT /accounts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountUpdate {
    pub name: String,
    pub settings: AccountSettings,
}
