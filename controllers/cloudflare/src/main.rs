//! Cloudflare Provider
//!
//! Kubernetes controller reconciling Cloudflare managed resources:
//! - Account: adopts an existing Cloudflare account by external name and
//!   keeps its name and two-factor enforcement in sync
//!
//! Credentials come from the ProviderConfig each resource references.

mod account;
mod backoff;
mod config;
mod connector;
mod controller;
mod credentials;
mod error;
mod managed;
mod metrics;
mod reconciler;
mod watcher;

#[cfg(test)]
mod reconciler_test;
#[cfg(test)]
mod test_utils;

use crate::config::{LogFormat, ProviderSettings};
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.compact().init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    let settings = ProviderSettings::from_env()?;
    init_tracing(settings.log_format);

    // kube and reqwest both pull in rustls; pick one process-wide provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    info!("Starting Cloudflare provider");
    info!("Configuration:");
    info!("  Cloudflare API: {}", settings.api_url);
    info!("  Poll interval: {}s", settings.poll_interval.as_secs());
    info!("  Max concurrent reconciles: {}", settings.max_reconcile_rate);
    info!("  Metrics address: {}", settings.metrics_addr);

    let controller = Controller::new(settings).await?;
    controller.run().await?;

    Ok(())
}
