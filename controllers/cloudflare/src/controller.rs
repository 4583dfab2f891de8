//! Main controller implementation.
//!
//! Wires the Kubernetes client, the Account connector and its hooks, the
//! Account watcher, and the metrics/probe server, then waits for either task
//! to exit.

use crate::backoff::ResourceBackoffs;
use crate::config::ProviderSettings;
use crate::connector::{AccountConnector, http_client_factory};
use crate::credentials::{KubeCredentialSource, KubeProviderConfigSource, KubeUsageTracker};
use crate::error::ControllerError;
use crate::metrics::Metrics;
use crate::watcher::{Context, watch_accounts};
use kube::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for Cloudflare managed resources.
pub struct Controller {
    account_watcher: JoinHandle<Result<(), ControllerError>>,
    metrics_server: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and starts its tasks.
    pub async fn new(settings: ProviderSettings) -> Result<Self, ControllerError> {
        info!("Initializing Cloudflare provider");

        let client = Client::try_default().await?;

        let connector = AccountConnector::new(
            Arc::new(KubeUsageTracker::new(client.clone())),
            Arc::new(KubeProviderConfigSource::new(client.clone())),
            Arc::new(KubeCredentialSource::new(client.clone())),
            http_client_factory(settings.api_url.clone(), settings.http_timeout),
        );

        let metrics = Metrics::new().map_err(|e| ControllerError::Metrics(e.to_string()))?;

        let ctx = Arc::new(Context {
            client,
            connector: Arc::new(connector),
            backoffs: ResourceBackoffs::default(),
            metrics: metrics.clone(),
            poll_interval: settings.poll_interval,
        });

        let metrics_server = {
            let metrics = metrics.clone();
            let addr = settings.metrics_addr;
            tokio::spawn(async move { metrics.serve(addr).await })
        };

        let account_watcher = {
            let concurrency = settings.max_reconcile_rate;
            tokio::spawn(async move { watch_accounts(ctx, concurrency).await })
        };

        metrics.set_ready(true);

        Ok(Self {
            account_watcher,
            metrics_server,
        })
    }

    /// Runs until the watcher stops (shutdown signal) or either task fails.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Cloudflare provider running");

        tokio::select! {
            result = &mut self.account_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("Account watcher panicked: {}", e)))??;
            }
            result = &mut self.metrics_server => {
                result.map_err(|e| ControllerError::Metrics(format!("metrics server panicked: {}", e)))??;
            }
        }

        info!("Cloudflare provider stopped");
        Ok(())
    }
}
