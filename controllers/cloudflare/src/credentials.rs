//! ProviderConfig resolution, credential extraction and usage tracking.
//!
//! The connector depends on three hooks:
//! - `UsageTracker` records that a managed resource uses a ProviderConfig
//! - `ProviderConfigSource` fetches a ProviderConfig by name
//! - `CredentialSource` turns the config's `credentials` block into raw bytes
//!
//! Each has a Kubernetes-backed implementation used by the binary. Tests
//! substitute their own.

use crate::managed::ManagedResource;
use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use crds::{
    CredentialsSource, EnvSelector, FsSelector, ProviderConfig, ProviderConfigUsage,
    ProviderConfigUsageSpec, ProviderCredentials, SecretKeySelector, TypedReference,
};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use tracing::debug;

/// Field manager used for server-side apply
pub const FIELD_MANAGER: &str = "provider-cloudflare";

/// Records ProviderConfig usage for a managed resource
#[async_trait]
pub trait UsageTracker: Send + Sync {
    async fn track(&self, resource: &ManagedResource) -> anyhow::Result<()>;
}

/// Looks up ProviderConfigs by name
#[async_trait]
pub trait ProviderConfigSource: Send + Sync {
    async fn get(&self, name: &str) -> anyhow::Result<ProviderConfig>;
}

/// Extracts credential bytes from a ProviderConfig's credentials block
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn resolve(&self, credentials: &ProviderCredentials) -> anyhow::Result<Vec<u8>>;
}

/// Tracks usage by applying a ProviderConfigUsage named after the resource UID
#[derive(Clone)]
pub struct KubeUsageTracker {
    api: Api<ProviderConfigUsage>,
}

impl KubeUsageTracker {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

/// Builds the ProviderConfigUsage recording that `resource` uses its config.
///
/// The usage is owned by the resource so it is garbage collected with it.
pub fn usage_for(resource: &ManagedResource) -> anyhow::Result<ProviderConfigUsage> {
    let uid = resource
        .uid()
        .ok_or_else(|| anyhow!("{} {} has no UID", resource.kind(), resource.name()))?;

    let mut usage = ProviderConfigUsage::new(
        &uid,
        ProviderConfigUsageSpec {
            provider_config_ref: resource.provider_config_ref().clone(),
            resource_ref: TypedReference {
                api_version: resource.api_version(),
                kind: resource.kind().to_string(),
                name: resource.name(),
                uid: Some(uid.clone()),
            },
        },
    );
    usage.metadata = ObjectMeta {
        name: Some(uid.clone()),
        owner_references: Some(vec![OwnerReference {
            api_version: resource.api_version(),
            kind: resource.kind().to_string(),
            name: resource.name(),
            uid,
            ..Default::default()
        }]),
        ..Default::default()
    };
    Ok(usage)
}

#[async_trait]
impl UsageTracker for KubeUsageTracker {
    async fn track(&self, resource: &ManagedResource) -> anyhow::Result<()> {
        let usage = usage_for(resource)?;
        let name = usage.metadata.name.clone().unwrap_or_default();
        debug!(
            "Tracking ProviderConfig {} usage by {} {}",
            resource.provider_config_ref().name,
            resource.kind(),
            resource.name()
        );
        let params = PatchParams::apply(FIELD_MANAGER).force();
        self.api
            .patch(&name, &params, &Patch::Apply(&usage))
            .await
            .with_context(|| format!("applying ProviderConfigUsage {}", name))?;
        Ok(())
    }
}

/// Reads cluster-scoped ProviderConfigs
#[derive(Clone)]
pub struct KubeProviderConfigSource {
    api: Api<ProviderConfig>,
}

impl KubeProviderConfigSource {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl ProviderConfigSource for KubeProviderConfigSource {
    async fn get(&self, name: &str) -> anyhow::Result<ProviderConfig> {
        Ok(self.api.get(name).await?)
    }
}

/// Resolves every credential source the provider supports
#[derive(Clone)]
pub struct KubeCredentialSource {
    client: Client,
}

impl KubeCredentialSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialSource for KubeCredentialSource {
    async fn resolve(&self, credentials: &ProviderCredentials) -> anyhow::Result<Vec<u8>> {
        match credentials.source {
            CredentialsSource::Secret => {
                let selector = credentials
                    .secret_ref
                    .as_ref()
                    .ok_or_else(|| anyhow!("no secretRef given for Secret source"))?;
                let api: Api<Secret> = Api::namespaced(self.client.clone(), &selector.namespace);
                let secret = api.get(&selector.name).await.with_context(|| {
                    format!("reading Secret {}/{}", selector.namespace, selector.name)
                })?;
                from_secret(&secret, selector)
            }
            CredentialsSource::Environment => {
                let selector = credentials
                    .env
                    .as_ref()
                    .ok_or_else(|| anyhow!("no env selector given for Environment source"))?;
                from_env(selector)
            }
            CredentialsSource::Filesystem => {
                let selector = credentials
                    .fs
                    .as_ref()
                    .ok_or_else(|| anyhow!("no fs selector given for Filesystem source"))?;
                from_filesystem(selector).await
            }
            CredentialsSource::None | CredentialsSource::InjectedIdentity => {
                bail!("credentials source {} is not supported", credentials.source)
            }
        }
    }
}

/// Value of `selector.key` in a fetched Secret
pub fn from_secret(secret: &Secret, selector: &SecretKeySelector) -> anyhow::Result<Vec<u8>> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(&selector.key))
        .map(|value| value.0.clone())
        .ok_or_else(|| {
            anyhow!(
                "key {} not found in Secret {}/{}",
                selector.key,
                selector.namespace,
                selector.name
            )
        })
}

/// Value of the named environment variable
pub fn from_env(selector: &EnvSelector) -> anyhow::Result<Vec<u8>> {
    std::env::var(&selector.name)
        .map(String::into_bytes)
        .with_context(|| format!("reading environment variable {}", selector.name))
}

/// Contents of the file at `selector.path`
pub async fn from_filesystem(selector: &FsSelector) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(&selector.path)
        .await
        .with_context(|| format!("reading {}", selector.path))
}
