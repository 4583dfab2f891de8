//! Fields and behaviour shared by every Cloudflare managed resource

use crate::conditions::{Condition, ConditionedStatus};
use crate::references::ProviderConfigReference;
use kube::{Resource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Annotation holding the Cloudflare identifier of the external resource
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Finalizer held while the external resource may still need cleanup
pub const MANAGED_FINALIZER: &str = "finalizer.managedresource.crossplane.io";

/// What happens to the external resource when the managed resource is deleted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum DeletionPolicy {
    /// Leave the external resource in place
    Orphan,
    /// Delete the external resource
    #[default]
    Delete,
}

/// Common surface of managed resources, used by the generic reconciler
pub trait Managed: Resource + Clone + Send + Sync + 'static {
    type Status: ConditionedStatus + Default + Serialize + Clone + Send + Sync;

    fn provider_config_ref(&self) -> &ProviderConfigReference;
    fn deletion_policy(&self) -> DeletionPolicy;
    fn managed_status(&self) -> Option<&Self::Status>;
    fn managed_status_mut(&mut self) -> &mut Self::Status;

    /// Cloudflare identifier from the external-name annotation, if non-empty
    fn external_name(&self) -> Option<String> {
        self.meta()
            .annotations
            .as_ref()
            .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn set_external_name(&mut self, value: impl Into<String>) {
        self.meta_mut()
            .annotations
            .get_or_insert_with(Default::default)
            .insert(EXTERNAL_NAME_ANNOTATION.to_string(), value.into());
    }

    /// Set conditions on the status, creating it if absent
    fn set_conditions(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        self.managed_status_mut().set_conditions(conditions);
    }

    fn is_being_deleted(&self) -> bool {
        self.meta().deletion_timestamp.is_some()
    }

    fn has_finalizer(&self) -> bool {
        self.finalizers().iter().any(|f| f == MANAGED_FINALIZER)
    }
}
