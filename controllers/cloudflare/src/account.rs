//! Account external client.
//!
//! Accounts already exist in Cloudflare; a managed Account adopts one by
//! external name. Observe reports drift on the fields in `COMPARED_FIELDS`
//! (or absence when no external name is set), Update pushes them back,
//! Create and Delete never call the API.

use crate::managed::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, ManagedResource,
    ProviderError,
};
use async_trait::async_trait;
use cloudflare_client::{self as cf, CloudflareClientTrait};
use crds::{AccountParameters, Condition, Managed};
use std::sync::Arc;
use tracing::{debug, info};

/// A spec field compared against the Cloudflare snapshot
pub struct ComparedField {
    pub name: &'static str,
    pub matches: fn(&AccountParameters, &cf::Account) -> bool,
}

/// Fields whose drift triggers an Update
pub const COMPARED_FIELDS: &[ComparedField] = &[
    ComparedField {
        name: "name",
        matches: |desired, observed| desired.name == observed.name,
    },
    ComparedField {
        name: "settings.enforceTwoFactor",
        // A snapshot without settings cannot confirm the desired value
        matches: |desired, observed| {
            observed
                .settings
                .as_ref()
                .is_some_and(|s| s.enforce_two_factor == desired.settings.enforce_two_factor)
        },
    },
];

/// Names of the compared fields that differ between spec and snapshot
pub fn drifted_fields(desired: &AccountParameters, observed: &cf::Account) -> Vec<&'static str> {
    COMPARED_FIELDS
        .iter()
        .filter(|field| !(field.matches)(desired, observed))
        .map(|field| field.name)
        .collect()
}

/// Request body sent by Update
pub fn account_update(desired: &AccountParameters) -> cf::AccountUpdate {
    cf::AccountUpdate {
        name: desired.name.clone(),
        settings: cf::AccountSettings {
            enforce_two_factor: desired.settings.enforce_two_factor,
        },
    }
}

/// Lifecycle operations for Account resources
pub struct AccountExternal {
    client: Arc<dyn CloudflareClientTrait>,
}

impl AccountExternal {
    pub fn new(client: Arc<dyn CloudflareClientTrait>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for AccountExternal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountExternal")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

#[async_trait]
impl ExternalClient for AccountExternal {
    async fn observe(
        &self,
        resource: &mut ManagedResource,
    ) -> Result<ExternalObservation, ProviderError> {
        let account = resource.as_account_mut().ok_or(ProviderError::TypeMismatch)?;
        // Not adopted yet; Create reports why it cannot proceed
        let Some(id) = account.external_name() else {
            return Ok(ExternalObservation::default());
        };

        let observed = self.client.get_account(&id).await?;

        account.set_conditions([Condition::available()]);
        account.managed_status_mut().at_provider.account_type = Some(observed.account_type.clone());

        let drifted = drifted_fields(&account.spec.for_provider, &observed);
        if !drifted.is_empty() {
            debug!("Account {} drifted on {:?}", id, drifted);
        }

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date: drifted.is_empty(),
        })
    }

    async fn create(
        &self,
        resource: &mut ManagedResource,
    ) -> Result<ExternalCreation, ProviderError> {
        let account = resource.as_account().ok_or(ProviderError::TypeMismatch)?;
        if account.external_name().is_none() {
            return Err(ProviderError::CreateNotSupported);
        }
        Ok(ExternalCreation)
    }

    async fn update(&self, resource: &mut ManagedResource) -> Result<ExternalUpdate, ProviderError> {
        let account = resource.as_account().ok_or(ProviderError::TypeMismatch)?;
        let id = account.external_name().unwrap_or_default();

        info!("Updating Cloudflare account {}", id);
        self.client
            .update_account(&id, &account_update(&account.spec.for_provider))
            .await?;
        Ok(ExternalUpdate)
    }

    async fn delete(&self, _resource: &mut ManagedResource) -> Result<(), ProviderError> {
        Ok(())
    }
}
