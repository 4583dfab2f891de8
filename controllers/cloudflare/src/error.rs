//! Controller-specific error types.
//!
//! Errors of the provider binary itself. Failures of a single reconciliation
//! pass are `ProviderError`s (see `managed`) and end up in resource status.

use crate::managed::ProviderError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Cloudflare provider.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Lifecycle failure for a managed resource
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),

    /// Metrics or probe server failed
    #[error("Metrics server error: {0}")]
    Metrics(String),
}
