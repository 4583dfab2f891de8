//! Status conditions shared by all managed resources
//!
//! Two condition types are tracked:
//! - `Ready`: whether the external resource is usable
//! - `Synced`: whether the last reconciliation pass succeeded
//!
//! A status holds at most one condition per type. Setting a condition
//! replaces the previous one of the same type, but keeps its
//! `lastTransitionTime` when nothing else changed so repeated passes do not
//! churn the status.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum ConditionType {
    Ready,
    Synced,
}

/// Condition status, following the Kubernetes convention
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

/// Machine-readable reason for a condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionReason {
    Available,
    Unavailable,
    Creating,
    Deleting,
    ReconcileSuccess,
    ReconcileError,
}

/// A single observation about a managed resource
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub status: ConditionStatus,
    pub last_transition_time: DateTime<Utc>,
    pub reason: ConditionReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    fn new(
        condition_type: ConditionType,
        status: ConditionStatus,
        reason: ConditionReason,
        message: Option<String>,
    ) -> Self {
        Self {
            condition_type,
            status,
            last_transition_time: Utc::now(),
            reason,
            message,
        }
    }

    /// The external resource exists and is usable
    pub fn available() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::True, ConditionReason::Available, None)
    }

    /// The external resource is not usable
    pub fn unavailable() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, ConditionReason::Unavailable, None)
    }

    /// The external resource is being created
    pub fn creating() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, ConditionReason::Creating, None)
    }

    /// The managed resource is being deleted
    pub fn deleting() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, ConditionReason::Deleting, None)
    }

    /// The last reconciliation pass succeeded
    pub fn reconcile_success() -> Self {
        Self::new(ConditionType::Synced, ConditionStatus::True, ConditionReason::ReconcileSuccess, None)
    }

    /// The last reconciliation pass failed with `message`
    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::False,
            ConditionReason::ReconcileError,
            Some(message.into()),
        )
    }

    /// Equal in everything but `lastTransitionTime`
    pub fn equivalent(&self, other: &Condition) -> bool {
        self.condition_type == other.condition_type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Implemented by every managed-resource status that carries conditions
pub trait ConditionedStatus {
    fn conditions(&self) -> &[Condition];
    fn conditions_mut(&mut self) -> &mut Vec<Condition>;

    /// Set conditions, replacing any existing condition of the same type
    fn set_conditions(&mut self, new: impl IntoIterator<Item = Condition>) {
        let conditions = self.conditions_mut();
        for condition in new {
            match conditions
                .iter_mut()
                .find(|c| c.condition_type == condition.condition_type)
            {
                Some(existing) if existing.equivalent(&condition) => {}
                Some(existing) => *existing = condition,
                None => conditions.push(condition),
            }
        }
    }

    /// Look up the condition of the given type
    fn condition(&self, condition_type: ConditionType) -> Option<&Condition> {
        self.conditions()
            .iter()
            .find(|c| c.condition_type == condition_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Default)]
    struct TestStatus {
        conditions: Vec<Condition>,
    }

    impl ConditionedStatus for TestStatus {
        fn conditions(&self) -> &[Condition] {
            &self.conditions
        }
        fn conditions_mut(&mut self) -> &mut Vec<Condition> {
            &mut self.conditions
        }
    }

    #[test]
    fn test_set_conditions_last_write_wins_per_type() {
        let mut status = TestStatus::default();
        status.set_conditions([Condition::creating(), Condition::reconcile_success()]);
        status.set_conditions([Condition::available()]);

        assert_eq!(status.conditions.len(), 2);
        let ready = status.condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.reason, ConditionReason::Available);
        assert_eq!(ready.status, ConditionStatus::True);
        let synced = status.condition(ConditionType::Synced).unwrap();
        assert_eq!(synced.reason, ConditionReason::ReconcileSuccess);
    }

    #[test]
    fn test_set_equivalent_condition_keeps_transition_time() {
        let mut status = TestStatus::default();
        let mut first = Condition::available();
        first.last_transition_time = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        status.set_conditions([first.clone()]);

        status.set_conditions([Condition::available()]);

        assert_eq!(status.conditions, vec![first]);
    }

    #[test]
    fn test_reconcile_error_message_change_replaces_condition() {
        let mut status = TestStatus::default();
        status.set_conditions([Condition::reconcile_error("first")]);
        status.set_conditions([Condition::reconcile_error("second")]);

        let synced = status.condition(ConditionType::Synced).unwrap();
        assert_eq!(synced.message.as_deref(), Some("second"));
        assert_eq!(status.conditions.len(), 1);
    }

    #[test]
    fn test_condition_serializes_with_kubernetes_field_names() {
        let value = serde_json::to_value(Condition::reconcile_error("boom")).unwrap();
        assert_eq!(value["type"], "Synced");
        assert_eq!(value["status"], "False");
        assert_eq!(value["reason"], "ReconcileError");
        assert_eq!(value["message"], "boom");
        assert!(value.get("lastTransitionTime").is_some());
    }
}
