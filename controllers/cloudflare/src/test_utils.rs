//! Test utilities for unit testing the connector, external client and
//! reconciler
//!
//! Builders for test resources plus in-memory stand-ins for the
//! Kubernetes-backed hooks.

use crate::connector::{AccountConnector, ClientFactory};
use crate::credentials::{CredentialSource, ProviderConfigSource, UsageTracker};
use crate::managed::{
    ExternalClient, ExternalConnector, ExternalCreation, ExternalObservation, ExternalUpdate,
    ManagedResource, ProviderError,
};
use anyhow::anyhow;
use async_trait::async_trait;
use cloudflare_client::{self as cf, CloudflareClientTrait, MockCloudflareClient};
use crds::*;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

pub const TEST_ACCOUNT_ID: &str = "01a7362d577a6c3019a474fd6f485823";
pub const TEST_TOKEN: &str = "test-token";

/// Account resource named `name` adopting `external_name`
pub fn create_test_account(
    name: &str,
    external_name: &str,
    desired_name: &str,
    enforce_two_factor: bool,
) -> Account {
    Account {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            uid: Some(format!("uid-{}", name)),
            annotations: Some(BTreeMap::from([(
                EXTERNAL_NAME_ANNOTATION.to_string(),
                external_name.to_string(),
            )])),
            ..Default::default()
        },
        spec: AccountSpec {
            for_provider: AccountParameters {
                name: desired_name.to_string(),
                settings: crds::AccountSettings { enforce_two_factor },
            },
            provider_config_ref: ProviderConfigReference::default(),
            deletion_policy: DeletionPolicy::Delete,
        },
        status: None,
    }
}

/// Zone resource, used to exercise kind checks
pub fn create_test_zone(name: &str) -> Zone {
    Zone {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            uid: Some(format!("uid-{}", name)),
            ..Default::default()
        },
        spec: ZoneSpec {
            for_provider: ZoneParameters {
                name: "example.com".to_string(),
                ..Default::default()
            },
            provider_config_ref: ProviderConfigReference::default(),
            deletion_policy: DeletionPolicy::Delete,
        },
        status: None,
    }
}

/// Cloudflare account snapshot as the API would return it
pub fn cloudflare_account(id: &str, name: &str, enforce_two_factor: bool) -> cf::Account {
    cf::Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type: "standard".to_string(),
        created_on: None,
        settings: Some(cf::AccountSettings { enforce_two_factor }),
    }
}

/// ProviderConfig reading the token from a Secret
pub fn secret_provider_config(name: &str) -> ProviderConfig {
    ProviderConfig::new(
        name,
        ProviderConfigSpec {
            credentials: ProviderCredentials {
                source: CredentialsSource::Secret,
                secret_ref: Some(SecretKeySelector {
                    name: "cloudflare-creds".to_string(),
                    namespace: "crossplane-system".to_string(),
                    key: "token".to_string(),
                }),
                env: None,
                fs: None,
            },
        },
    )
}

/// Records tracked resources; fails when `fail` is set
#[derive(Default)]
pub struct FakeUsageTracker {
    pub tracked: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl UsageTracker for FakeUsageTracker {
    async fn track(&self, resource: &ManagedResource) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow!("usage API unavailable"));
        }
        self.tracked.lock().unwrap().push(resource.name());
        Ok(())
    }
}

/// ProviderConfigs held in memory
#[derive(Default)]
pub struct FakeConfigSource {
    pub configs: HashMap<String, ProviderConfig>,
}

impl FakeConfigSource {
    pub fn with(configs: impl IntoIterator<Item = ProviderConfig>) -> Self {
        Self {
            configs: configs
                .into_iter()
                .map(|c| (c.metadata.name.clone().unwrap_or_default(), c))
                .collect(),
        }
    }
}

#[async_trait]
impl ProviderConfigSource for FakeConfigSource {
    async fn get(&self, name: &str) -> anyhow::Result<ProviderConfig> {
        self.configs
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("providerconfigs \"{}\" not found", name))
    }
}

/// Returns fixed credential bytes, or an error when `None`
pub struct FakeCredentialSource {
    pub data: Option<Vec<u8>>,
}

#[async_trait]
impl CredentialSource for FakeCredentialSource {
    async fn resolve(&self, credentials: &ProviderCredentials) -> anyhow::Result<Vec<u8>> {
        self.data
            .clone()
            .ok_or_else(|| anyhow!("no credentials for source {}", credentials.source))
    }
}

/// Client factory handing out `mock` and recording the credentials it saw
pub fn mock_client_factory(
    mock: MockCloudflareClient,
    seen: Arc<Mutex<Vec<Vec<u8>>>>,
) -> ClientFactory {
    Arc::new(move |credentials: &[u8]| {
        seen.lock().unwrap().push(credentials.to_vec());
        Ok(Arc::new(mock.clone()) as Arc<dyn CloudflareClientTrait>)
    })
}

/// Fully wired connector over a mock Cloudflare client
pub struct TestConnector {
    pub connector: AccountConnector,
    pub usage: Arc<FakeUsageTracker>,
    pub mock: MockCloudflareClient,
    pub seen_credentials: Arc<Mutex<Vec<Vec<u8>>>>,
}

pub fn create_test_connector(mock: MockCloudflareClient) -> TestConnector {
    let usage = Arc::new(FakeUsageTracker::default());
    let seen_credentials = Arc::new(Mutex::new(Vec::new()));
    let connector = AccountConnector::new(
        usage.clone(),
        Arc::new(FakeConfigSource::with([secret_provider_config("default")])),
        Arc::new(FakeCredentialSource {
            data: Some(TEST_TOKEN.as_bytes().to_vec()),
        }),
        mock_client_factory(mock.clone(), seen_credentials.clone()),
    );
    TestConnector {
        connector,
        usage,
        mock,
        seen_credentials,
    }
}

/// External client whose results are fixed up front
#[derive(Clone, Default)]
pub struct ScriptedExternal {
    pub observation: ExternalObservation,
    pub fail_observe: bool,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fail_delete: bool,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl ScriptedExternal {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str, fail: bool) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call);
        if fail {
            Err(ProviderError::Api(cf::CloudflareError::Api(format!(
                "{} failed",
                call
            ))))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ExternalClient for ScriptedExternal {
    async fn observe(
        &self,
        _resource: &mut ManagedResource,
    ) -> Result<ExternalObservation, ProviderError> {
        self.record("observe", self.fail_observe)?;
        Ok(self.observation)
    }

    async fn create(
        &self,
        _resource: &mut ManagedResource,
    ) -> Result<ExternalCreation, ProviderError> {
        self.record("create", self.fail_create)?;
        Ok(ExternalCreation)
    }

    async fn update(
        &self,
        _resource: &mut ManagedResource,
    ) -> Result<ExternalUpdate, ProviderError> {
        self.record("update", self.fail_update)?;
        Ok(ExternalUpdate)
    }

    async fn delete(&self, _resource: &mut ManagedResource) -> Result<(), ProviderError> {
        self.record("delete", self.fail_delete)
    }
}

/// Connector handing out a `ScriptedExternal`, or failing to connect
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    pub external: ScriptedExternal,
    pub fail_connect: bool,
    pub connects: Arc<Mutex<usize>>,
}

#[async_trait]
impl ExternalConnector for ScriptedConnector {
    async fn connect(
        &self,
        _resource: &ManagedResource,
    ) -> Result<Box<dyn ExternalClient>, ProviderError> {
        *self.connects.lock().unwrap() += 1;
        if self.fail_connect {
            return Err(ProviderError::ConfigNotFound(
                "providerconfigs \"default\" not found".to_string(),
            ));
        }
        Ok(Box::new(self.external.clone()))
    }
}
