//! Managed resource reconciler.
//!
//! `reconcile_pass` drives one resource through a single
//! Connect / Observe / (Create | Update) pass, or through Delete when the
//! resource is being deleted, and records the result as conditions on the
//! in-memory resource. Persisting status and scheduling the next pass is the
//! watcher's job.

use crate::managed::{ExternalConnector, ManagedResource, ProviderError};
use crds::{Condition, DeletionPolicy, Managed};
use tracing::{debug, info, warn};

/// What a reconciliation pass did
#[derive(Debug)]
pub enum PassOutcome {
    /// External resource matches the spec
    UpToDate,
    /// Create was called
    Created,
    /// Update was called
    Updated,
    /// Deletion handled, the finalizer may be removed
    Deleted,
    /// The pass failed; `Synced=False` carries the message
    Failed(ProviderError),
}

impl PassOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PassOutcome::UpToDate => "up_to_date",
            PassOutcome::Created => "created",
            PassOutcome::Updated => "updated",
            PassOutcome::Deleted => "deleted",
            PassOutcome::Failed(_) => "error",
        }
    }
}

fn set_conditions(resource: &mut ManagedResource, conditions: Vec<Condition>) {
    match resource {
        ManagedResource::Account(a) => a.set_conditions(conditions),
        ManagedResource::Zone(z) => z.set_conditions(conditions),
    }
}

fn is_being_deleted(resource: &ManagedResource) -> bool {
    match resource {
        ManagedResource::Account(a) => a.is_being_deleted(),
        ManagedResource::Zone(z) => z.is_being_deleted(),
    }
}

fn deletion_policy(resource: &ManagedResource) -> DeletionPolicy {
    match resource {
        ManagedResource::Account(a) => a.deletion_policy(),
        ManagedResource::Zone(z) => z.deletion_policy(),
    }
}

fn fail(resource: &mut ManagedResource, err: ProviderError) -> PassOutcome {
    warn!(
        "Reconciling {} {} failed: {}",
        resource.kind(),
        resource.name(),
        err
    );
    set_conditions(resource, vec![Condition::reconcile_error(err.to_string())]);
    PassOutcome::Failed(err)
}

/// Run one reconciliation pass over `resource`
pub async fn reconcile_pass(
    connector: &dyn ExternalConnector,
    resource: &mut ManagedResource,
) -> PassOutcome {
    if is_being_deleted(resource) {
        return delete_pass(connector, resource).await;
    }

    let external = match connector.connect(resource).await {
        Ok(external) => external,
        Err(e) => return fail(resource, e),
    };

    let observation = match external.observe(resource).await {
        Ok(observation) => observation,
        Err(e) => {
            set_conditions(resource, vec![Condition::unavailable()]);
            return fail(resource, e);
        }
    };

    let outcome = if !observation.resource_exists {
        set_conditions(resource, vec![Condition::creating()]);
        info!("Creating {} {}", resource.kind(), resource.name());
        match external.create(resource).await {
            Ok(_) => PassOutcome::Created,
            Err(e) => return fail(resource, e),
        }
    } else if !observation.resource_up_to_date {
        info!("Updating {} {}", resource.kind(), resource.name());
        match external.update(resource).await {
            Ok(_) => PassOutcome::Updated,
            Err(e) => return fail(resource, e),
        }
    } else {
        debug!("{} {} is up to date", resource.kind(), resource.name());
        PassOutcome::UpToDate
    };

    set_conditions(resource, vec![Condition::reconcile_success()]);
    outcome
}

async fn delete_pass(
    connector: &dyn ExternalConnector,
    resource: &mut ManagedResource,
) -> PassOutcome {
    set_conditions(resource, vec![Condition::deleting()]);

    if deletion_policy(resource) == DeletionPolicy::Orphan {
        info!(
            "Orphaning external resource of {} {}",
            resource.kind(),
            resource.name()
        );
        return PassOutcome::Deleted;
    }

    let external = match connector.connect(resource).await {
        Ok(external) => external,
        Err(e) => return fail(resource, e),
    };
    if let Err(e) = external.delete(resource).await {
        return fail(resource, e);
    }

    info!("Deleted {} {}", resource.kind(), resource.name());
    set_conditions(resource, vec![Condition::reconcile_success()]);
    PassOutcome::Deleted
}
