//! Cloudflare provider CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the Cloudflare provider:
//! the managed kinds (`Account`, `Zone`), provider configuration, and the
//! status and reference types they share.

pub mod account;
pub mod conditions;
pub mod managed;
pub mod provider_config;
pub mod references;
pub mod zone;

pub use account::*;
pub use conditions::*;
pub use managed::*;
pub use provider_config::*;
pub use references::*;
pub use zone::*;
