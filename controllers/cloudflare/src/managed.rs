//! Managed resource lifecycle contracts.
//!
//! A reconciliation pass talks to Cloudflare through two seams:
//! - `ExternalConnector` turns a managed resource into an authenticated
//!   `ExternalClient` (credentials, usage tracking, API client construction)
//! - `ExternalClient` implements Observe / Create / Update / Delete for one kind
//!
//! Resources cross these seams as `ManagedResource`, a closed union of the
//! kinds this provider knows. Each client checks the variant it was handed
//! and rejects the rest with `ProviderError::TypeMismatch`.

use async_trait::async_trait;
use cloudflare_client::CloudflareError;
use crds::{Account, Managed, ProviderConfigReference, Zone};
use kube::{Resource, ResourceExt};
use thiserror::Error;

/// Errors returned by connectors and external clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The resource handed to an Account client is some other kind
    #[error("managed resource is not an Account custom resource")]
    TypeMismatch,

    #[error("cannot track ProviderConfig usage: {0}")]
    TrackingError(String),

    #[error("cannot get ProviderConfig: {0}")]
    ConfigNotFound(String),

    #[error("cannot get credentials: {0}")]
    CredentialError(String),

    #[error("cannot create Cloudflare client: {0}")]
    ClientConstructionError(String),

    /// Accounts are adopted by external name, never created
    #[error("cannot create Account resource (observe and update only)")]
    CreateNotSupported,

    /// Cloudflare API error, passed through untouched
    #[error(transparent)]
    Api(#[from] CloudflareError),
}

/// A managed resource of any kind this provider serves
#[derive(Debug, Clone)]
pub enum ManagedResource {
    Account(Account),
    Zone(Zone),
}

impl ManagedResource {
    pub fn kind(&self) -> &'static str {
        match self {
            ManagedResource::Account(_) => "Account",
            ManagedResource::Zone(_) => "Zone",
        }
    }

    pub fn api_version(&self) -> String {
        match self {
            ManagedResource::Account(_) => Account::api_version(&()).to_string(),
            ManagedResource::Zone(_) => Zone::api_version(&()).to_string(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ManagedResource::Account(a) => a.name_any(),
            ManagedResource::Zone(z) => z.name_any(),
        }
    }

    pub fn uid(&self) -> Option<String> {
        match self {
            ManagedResource::Account(a) => a.uid(),
            ManagedResource::Zone(z) => z.uid(),
        }
    }

    pub fn provider_config_ref(&self) -> &ProviderConfigReference {
        match self {
            ManagedResource::Account(a) => a.provider_config_ref(),
            ManagedResource::Zone(z) => z.provider_config_ref(),
        }
    }

    pub fn as_account(&self) -> Option<&Account> {
        match self {
            ManagedResource::Account(a) => Some(a),
            ManagedResource::Zone(_) => None,
        }
    }

    pub fn as_account_mut(&mut self) -> Option<&mut Account> {
        match self {
            ManagedResource::Account(a) => Some(a),
            ManagedResource::Zone(_) => None,
        }
    }
}

impl From<Account> for ManagedResource {
    fn from(account: Account) -> Self {
        ManagedResource::Account(account)
    }
}

impl From<Zone> for ManagedResource {
    fn from(zone: Zone) -> Self {
        ManagedResource::Zone(zone)
    }
}

/// Result of observing the external resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    /// The external resource exists
    pub resource_exists: bool,
    /// The external resource matches the desired spec
    pub resource_up_to_date: bool,
}

/// Result of a successful Create
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalCreation;

/// Result of a successful Update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalUpdate;

/// Builds an authenticated client for one managed resource
#[async_trait]
pub trait ExternalConnector: Send + Sync {
    async fn connect(
        &self,
        resource: &ManagedResource,
    ) -> Result<Box<dyn ExternalClient>, ProviderError>;
}

/// Lifecycle operations against the external system.
///
/// `observe` may write observed fields and conditions into the resource
/// status; the other operations leave the resource untouched.
#[async_trait]
pub trait ExternalClient: Send + Sync {
    async fn observe(
        &self,
        resource: &mut ManagedResource,
    ) -> Result<ExternalObservation, ProviderError>;

    async fn create(&self, resource: &mut ManagedResource)
    -> Result<ExternalCreation, ProviderError>;

    async fn update(&self, resource: &mut ManagedResource) -> Result<ExternalUpdate, ProviderError>;

    async fn delete(&self, resource: &mut ManagedResource) -> Result<(), ProviderError>;
}
