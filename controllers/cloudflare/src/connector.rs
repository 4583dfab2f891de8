//! Connector for Account resources.
//!
//! `connect` runs five steps, each with its own failure:
//! 1. the resource must be an Account (`TypeMismatch`)
//! 2. record ProviderConfig usage (`TrackingError`)
//! 3. fetch the ProviderConfig (`ConfigNotFound`)
//! 4. extract the API token (`CredentialError`)
//! 5. build the Cloudflare client (`ClientConstructionError`)
//!
//! Only step 2 has side effects.

use crate::account::AccountExternal;
use crate::credentials::{CredentialSource, ProviderConfigSource, UsageTracker};
use crate::managed::{ExternalClient, ExternalConnector, ManagedResource, ProviderError};
use async_trait::async_trait;
use cloudflare_client::{CloudflareClient, CloudflareClientTrait, CloudflareError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builds an API client from raw credential bytes
pub type ClientFactory =
    Arc<dyn Fn(&[u8]) -> Result<Arc<dyn CloudflareClientTrait>, CloudflareError> + Send + Sync>;

/// Factory producing real HTTP clients against `base_url`
pub fn http_client_factory(base_url: String, timeout: Duration) -> ClientFactory {
    Arc::new(move |credentials: &[u8]| {
        let client = CloudflareClient::from_credentials(base_url.clone(), credentials, timeout)?;
        Ok(Arc::new(client) as Arc<dyn CloudflareClientTrait>)
    })
}

/// Connects Account resources to Cloudflare
#[derive(Clone)]
pub struct AccountConnector {
    usage: Arc<dyn UsageTracker>,
    configs: Arc<dyn ProviderConfigSource>,
    credentials: Arc<dyn CredentialSource>,
    new_client: ClientFactory,
}

impl AccountConnector {
    pub fn new(
        usage: Arc<dyn UsageTracker>,
        configs: Arc<dyn ProviderConfigSource>,
        credentials: Arc<dyn CredentialSource>,
        new_client: ClientFactory,
    ) -> Self {
        Self {
            usage,
            configs,
            credentials,
            new_client,
        }
    }
}

#[async_trait]
impl ExternalConnector for AccountConnector {
    async fn connect(
        &self,
        resource: &ManagedResource,
    ) -> Result<Box<dyn ExternalClient>, ProviderError> {
        let account = resource.as_account().ok_or(ProviderError::TypeMismatch)?;

        self.usage
            .track(resource)
            .await
            .map_err(|e| ProviderError::TrackingError(format!("{:#}", e)))?;

        let config_name = &account.spec.provider_config_ref.name;
        let config = self
            .configs
            .get(config_name)
            .await
            .map_err(|e| ProviderError::ConfigNotFound(format!("{:#}", e)))?;

        let data = self
            .credentials
            .resolve(&config.spec.credentials)
            .await
            .map_err(|e| ProviderError::CredentialError(format!("{:#}", e)))?;

        let client = (self.new_client)(&data)
            .map_err(|e| ProviderError::ClientConstructionError(e.to_string()))?;

        debug!(
            "Connected Account {} using ProviderConfig {}",
            resource.name(),
            config_name
        );
        Ok(Box::new(AccountExternal::new(client)))
    }
}
