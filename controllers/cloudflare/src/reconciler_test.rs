//! Unit tests for the reconciliation pass

#[cfg(test)]
mod tests {
    use crate::managed::{ExternalObservation, ManagedResource, ProviderError};
    use crate::reconciler::{PassOutcome, reconcile_pass};
    use crate::test_utils::*;
    use cloudflare_client::{MockCall, MockCloudflareClient};
    use crds::{
        Account, Condition, ConditionReason, ConditionStatus, ConditionType, ConditionedStatus,
        DeletionPolicy,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

    fn acme() -> ManagedResource {
        ManagedResource::Account(create_test_account("acme", TEST_ACCOUNT_ID, "acme", true))
    }

    fn deleting(policy: DeletionPolicy) -> ManagedResource {
        let mut account = create_test_account("acme", TEST_ACCOUNT_ID, "acme", true);
        account.metadata.deletion_timestamp = Some(Time(chrono::Utc::now()));
        account.metadata.finalizers = Some(vec![crds::MANAGED_FINALIZER.to_string()]);
        account.spec.deletion_policy = policy;
        ManagedResource::Account(account)
    }

    fn scripted(observation: ExternalObservation) -> ScriptedConnector {
        ScriptedConnector {
            external: ScriptedExternal {
                observation,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn exists(up_to_date: bool) -> ExternalObservation {
        ExternalObservation {
            resource_exists: true,
            resource_up_to_date: up_to_date,
        }
    }

    fn condition(resource: &ManagedResource, condition_type: ConditionType) -> Condition {
        let account: &Account = resource.as_account().unwrap();
        account
            .status
            .as_ref()
            .and_then(|s| s.condition(condition_type))
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_up_to_date_resource() {
        let connector = scripted(exists(true));
        let mut resource = acme();

        let outcome = reconcile_pass(&connector, &mut resource).await;

        assert!(matches!(outcome, PassOutcome::UpToDate));
        assert_eq!(connector.external.calls(), vec!["observe"]);
        let synced = condition(&resource, ConditionType::Synced);
        assert_eq!(synced.status, ConditionStatus::True);
        assert_eq!(synced.reason, ConditionReason::ReconcileSuccess);
    }

    #[tokio::test]
    async fn test_drift_triggers_update() {
        let connector = scripted(exists(false));
        let mut resource = acme();

        let outcome = reconcile_pass(&connector, &mut resource).await;

        assert!(matches!(outcome, PassOutcome::Updated));
        assert_eq!(connector.external.calls(), vec!["observe", "update"]);
        assert_eq!(
            condition(&resource, ConditionType::Synced).status,
            ConditionStatus::True
        );
    }

    #[tokio::test]
    async fn test_missing_resource_triggers_create() {
        let connector = scripted(ExternalObservation::default());
        let mut resource = acme();

        let outcome = reconcile_pass(&connector, &mut resource).await;

        assert!(matches!(outcome, PassOutcome::Created));
        assert_eq!(connector.external.calls(), vec!["observe", "create"]);
        assert_eq!(
            condition(&resource, ConditionType::Ready).reason,
            ConditionReason::Creating
        );
        assert_eq!(
            condition(&resource, ConditionType::Synced).reason,
            ConditionReason::ReconcileSuccess
        );
    }

    #[tokio::test]
    async fn test_connect_failure_sets_reconcile_error() {
        let connector = ScriptedConnector {
            fail_connect: true,
            ..Default::default()
        };
        let mut resource = acme();

        let outcome = reconcile_pass(&connector, &mut resource).await;

        assert!(matches!(outcome, PassOutcome::Failed(_)));
        assert!(connector.external.calls().is_empty());
        let synced = condition(&resource, ConditionType::Synced);
        assert_eq!(synced.status, ConditionStatus::False);
        assert_eq!(synced.reason, ConditionReason::ReconcileError);
        assert_eq!(
            synced.message.as_deref(),
            Some("cannot get ProviderConfig: providerconfigs \"default\" not found")
        );
    }

    #[tokio::test]
    async fn test_operation_failures() {
        let mut observe_fails = scripted(exists(true));
        observe_fails.external.fail_observe = true;
        let mut update_fails = scripted(exists(false));
        update_fails.external.fail_update = true;
        let mut create_fails = scripted(ExternalObservation::default());
        create_fails.external.fail_create = true;

        for (connector, failing_call) in [
            (observe_fails, "observe"),
            (update_fails, "update"),
            (create_fails, "create"),
        ] {
            let mut resource = acme();

            let outcome = reconcile_pass(&connector, &mut resource).await;

            assert!(matches!(outcome, PassOutcome::Failed(_)));
            assert_eq!(connector.external.calls().last(), Some(&failing_call));
            let synced = condition(&resource, ConditionType::Synced);
            assert_eq!(synced.status, ConditionStatus::False);
            assert_eq!(
                synced.message,
                Some(format!("Cloudflare API error: {} failed", failing_call))
            );
        }
    }

    #[tokio::test]
    async fn test_observe_failure_marks_unavailable() {
        let mut connector = scripted(exists(true));
        connector.external.fail_observe = true;
        let mut resource = acme();

        reconcile_pass(&connector, &mut resource).await;

        let ready = condition(&resource, ConditionType::Ready);
        assert_eq!(ready.status, ConditionStatus::False);
        assert_eq!(ready.reason, ConditionReason::Unavailable);
    }

    #[tokio::test]
    async fn test_delete_policy_calls_delete() {
        let connector = scripted(exists(true));
        let mut resource = deleting(DeletionPolicy::Delete);

        let outcome = reconcile_pass(&connector, &mut resource).await;

        assert!(matches!(outcome, PassOutcome::Deleted));
        assert_eq!(connector.external.calls(), vec!["delete"]);
        assert_eq!(
            condition(&resource, ConditionType::Ready).reason,
            ConditionReason::Deleting
        );
    }

    #[tokio::test]
    async fn test_orphan_policy_skips_external() {
        let connector = scripted(exists(true));
        let mut resource = deleting(DeletionPolicy::Orphan);

        let outcome = reconcile_pass(&connector, &mut resource).await;

        assert!(matches!(outcome, PassOutcome::Deleted));
        assert_eq!(*connector.connects.lock().unwrap(), 0);
        assert!(connector.external.calls().is_empty());
        assert_eq!(
            condition(&resource, ConditionType::Ready).reason,
            ConditionReason::Deleting
        );
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let mut connector = scripted(exists(true));
        connector.external.fail_delete = true;
        let mut resource = deleting(DeletionPolicy::Delete);

        let outcome = reconcile_pass(&connector, &mut resource).await;

        assert!(matches!(outcome, PassOutcome::Failed(_)));
        assert_eq!(
            condition(&resource, ConditionType::Synced).status,
            ConditionStatus::False
        );
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(PassOutcome::UpToDate.label(), "up_to_date");
        assert_eq!(PassOutcome::Created.label(), "created");
        assert_eq!(PassOutcome::Updated.label(), "updated");
        assert_eq!(PassOutcome::Deleted.label(), "deleted");
        assert_eq!(
            PassOutcome::Failed(ProviderError::TypeMismatch).label(),
            "error"
        );
    }

    #[tokio::test]
    async fn test_account_pass_against_mock_cloudflare() {
        let mock = MockCloudflareClient::new("http://test-cloudflare");
        mock.add_account(cloudflare_account(TEST_ACCOUNT_ID, "acme", false));
        let test = create_test_connector(mock);
        let mut resource = acme();

        let first = reconcile_pass(&test.connector, &mut resource).await;
        assert!(matches!(first, PassOutcome::Updated));

        let second = reconcile_pass(&test.connector, &mut resource).await;
        assert!(matches!(second, PassOutcome::UpToDate));

        assert_eq!(test.mock.calls().len(), 3);
        assert!(matches!(test.mock.calls()[1], MockCall::UpdateAccount(..)));
        assert_eq!(
            condition(&resource, ConditionType::Ready).reason,
            ConditionReason::Available
        );
        let status = resource.as_account().unwrap().status.as_ref().unwrap();
        assert_eq!(status.at_provider.account_type.as_deref(), Some("standard"));
        assert_eq!(test.usage.tracked.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unadopted_account_reports_create_not_supported() {
        let test = create_test_connector(MockCloudflareClient::new("http://test-cloudflare"));
        let mut resource =
            ManagedResource::Account(create_test_account("acme", "", "acme", true));

        let outcome = reconcile_pass(&test.connector, &mut resource).await;

        assert!(matches!(
            outcome,
            PassOutcome::Failed(ProviderError::CreateNotSupported)
        ));
        assert_eq!(test.mock.call_count(), 0);
        assert_eq!(
            condition(&resource, ConditionType::Synced).message.as_deref(),
            Some("cannot create Account resource (observe and update only)")
        );
    }
}
