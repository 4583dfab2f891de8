//! Account CRD
//!
//! A Cloudflare account. Accounts cannot be created through the API, so an
//! Account resource always adopts an existing account named by its
//! external-name annotation and keeps the name and two-factor setting in sync.

use crate::conditions::{Condition, ConditionedStatus};
use crate::managed::{DeletionPolicy, Managed};
use crate::references::ProviderConfigReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "account.cloudflare.crossplane.io",
    version = "v1alpha1",
    kind = "Account",
    status = "AccountStatus",
    category = "crossplane",
    category = "managed",
    category = "cloudflare",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME","type":"string","jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AccountSpec {
    /// Desired state of the account
    pub for_provider: AccountParameters,

    /// ProviderConfig holding the API credentials
    #[serde(default)]
    pub provider_config_ref: ProviderConfigReference,

    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountParameters {
    /// Display name of the account
    pub name: String,

    #[serde(default)]
    pub settings: AccountSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    /// Require every member to use two-factor authentication
    #[serde(default)]
    pub enforce_two_factor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    #[serde(default)]
    pub at_provider: AccountObservation,
}

/// Read-only fields reported by Cloudflare
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountObservation {
    /// Account plan type (e.g. "standard", "enterprise")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

impl ConditionedStatus for AccountStatus {
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}

impl Managed for Account {
    type Status = AccountStatus;

    fn provider_config_ref(&self) -> &ProviderConfigReference {
        &self.spec.provider_config_ref
    }

    fn deletion_policy(&self) -> DeletionPolicy {
        self.spec.deletion_policy
    }

    fn managed_status(&self) -> Option<&AccountStatus> {
        self.status.as_ref()
    }

    fn managed_status_mut(&mut self) -> &mut AccountStatus {
        self.status.get_or_insert_with(Default::default)
    }
}
