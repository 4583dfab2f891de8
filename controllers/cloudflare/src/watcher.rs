//! Kubernetes resource watchers.
//!
//! Runs `kube_runtime::Controller` over Account resources. For every event
//! the watcher makes sure the managed finalizer is present, runs one
//! reconciliation pass, persists the resulting status, and schedules the
//! next pass: after the poll interval on success, or with per-resource
//! Fibonacci backoff on failure.

use crate::backoff::ResourceBackoffs;
use crate::error::ControllerError;
use crate::managed::{ExternalConnector, ManagedResource};
use crate::metrics::Metrics;
use crate::reconciler::{PassOutcome, reconcile_pass};
use crds::{Account, MANAGED_FINALIZER, Managed};
use futures::StreamExt;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use kube_runtime::controller::{Action, Config as ControllerConfig};
use kube_runtime::{Controller, watcher};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Shared state handed to every reconciliation
pub struct Context {
    pub client: Client,
    pub connector: Arc<dyn ExternalConnector>,
    pub backoffs: ResourceBackoffs,
    pub metrics: Metrics,
    pub poll_interval: Duration,
}

/// Add the managed finalizer if it is missing
pub async fn ensure_finalizer<K>(api: &Api<K>, resource: &K) -> Result<(), ControllerError>
where
    K: Managed + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    if resource.has_finalizer() {
        return Ok(());
    }
    let name = resource.name_any();
    info!(
        "Adding finalizer {} to {} {}",
        MANAGED_FINALIZER,
        K::kind(&K::DynamicType::default()),
        name
    );

    let mut finalizers = resource.finalizers().to_vec();
    finalizers.push(MANAGED_FINALIZER.to_string());
    let patch = json!({ "metadata": { "finalizers": finalizers } });
    api.patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

/// Remove the managed finalizer, letting Kubernetes finish the deletion
pub async fn remove_finalizer<K>(api: &Api<K>, resource: &K) -> Result<(), ControllerError>
where
    K: Managed + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    if !resource.has_finalizer() {
        return Ok(());
    }
    let name = resource.name_any();
    info!(
        "Removing finalizer {} from {} {}",
        MANAGED_FINALIZER,
        K::kind(&K::DynamicType::default()),
        name
    );

    let finalizers: Vec<String> = resource
        .finalizers()
        .iter()
        .filter(|f| f.as_str() != MANAGED_FINALIZER)
        .cloned()
        .collect();
    let patch = json!({ "metadata": { "finalizers": finalizers } });
    api.patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

/// Write the whole status object through the status subresource
pub async fn patch_status<K>(
    api: &Api<K>,
    name: &str,
    status: &K::Status,
) -> Result<(), ControllerError>
where
    K: Managed + DeserializeOwned + Debug,
{
    let patch = json!({ "status": status });
    api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

/// Reconcile one Account event
pub async fn reconcile_account(
    account: Arc<Account>,
    ctx: Arc<Context>,
) -> Result<Action, ControllerError> {
    let name = account.name_any();
    let api: Api<Account> = Api::all(ctx.client.clone());

    if account.is_being_deleted() && !account.has_finalizer() {
        debug!("Account {} is being deleted and already released", name);
        return Ok(Action::await_change());
    }
    if !account.is_being_deleted() {
        ensure_finalizer(&api, account.as_ref()).await?;
    }

    info!("Reconciling Account {}", name);
    let started = Instant::now();
    let mut resource = ManagedResource::Account(account.as_ref().clone());
    let outcome = reconcile_pass(ctx.connector.as_ref(), &mut resource).await;
    ctx.metrics
        .record_pass("Account", outcome.label(), started.elapsed());

    if let Some(status) = resource.as_account().and_then(|a| a.status.as_ref()) {
        if account.status.as_ref() != Some(status) {
            patch_status(&api, &name, status).await?;
        }
    }

    match outcome {
        PassOutcome::Deleted => {
            remove_finalizer(&api, account.as_ref()).await?;
            ctx.backoffs.forget(&name);
            Ok(Action::await_change())
        }
        PassOutcome::Failed(e) => Err(e.into()),
        PassOutcome::UpToDate | PassOutcome::Created | PassOutcome::Updated => {
            ctx.backoffs.reset(&name);
            Ok(Action::requeue(ctx.poll_interval))
        }
    }
}

fn error_policy(account: Arc<Account>, err: &ControllerError, ctx: Arc<Context>) -> Action {
    let name = account.name_any();
    let delay = ctx.backoffs.next(&name);
    error!(
        "Reconciliation error for Account {}: {} (retrying in {}s)",
        name,
        err,
        delay.as_secs()
    );
    Action::requeue(delay)
}

/// Watch Account resources until shutdown
pub async fn watch_accounts(ctx: Arc<Context>, concurrency: u16) -> Result<(), ControllerError> {
    info!("Starting Account watcher");
    let api: Api<Account> = Api::all(ctx.client.clone());

    // Debounce batches bursts of events for the same object
    let controller_config = ControllerConfig::default()
        .debounce(Duration::from_secs(5))
        .concurrency(concurrency);

    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .shutdown_on_signal()
        .run(reconcile_account, error_policy, ctx)
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!("Reconciled Account {}", obj.name),
                Err(e) => error!("Controller error for Account: {}", e),
            }
        })
        .await;

    info!("Account watcher stopped");
    Ok(())
}
