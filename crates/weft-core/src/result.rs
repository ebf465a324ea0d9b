//! The outcome of a single node execution.

use crate::status::NodeStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one node execution, possibly a non-terminal (`Running`)
/// intermediate carrying partial `data`.
///
/// Invariant: `success == (status == NodeStatus::Completed)`; `data` is
/// present iff `success`; `error` is present iff `!success`. A `Running`
/// intermediate is neither `success` nor `!success` in the terminal sense —
/// it carries `success: true` only as a placeholder for wire shape
/// consistency (the original Python result sets `success=True` on every
/// non-terminal `NodeResult` too); only a terminal event's `success` flag
/// is load-bearing for downstream dependency checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResult {
    pub success: bool,
    pub status: NodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl NodeResult {
    pub fn running(start_time: f64) -> Self {
        Self {
            success: true,
            status: NodeStatus::Running,
            data: None,
            error: None,
            start_time: Some(start_time),
            end_time: None,
        }
    }

    pub fn running_with_data(start_time: f64, data: Value) -> Self {
        Self {
            success: true,
            status: NodeStatus::Running,
            data: Some(data),
            error: None,
            start_time: Some(start_time),
            end_time: None,
        }
    }

    pub fn completed(start_time: f64, end_time: f64, data: Value) -> Self {
        Self {
            success: true,
            status: NodeStatus::Completed,
            data: Some(data),
            error: None,
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    pub fn failed(start_time: Option<f64>, end_time: f64, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status: NodeStatus::Failed,
            data: None,
            error: Some(error.into()),
            start_time,
            end_time: Some(end_time),
        }
    }

    /// Synthetic failure for a node whose predecessors did not all succeed
    /// (§4.5, §7 "dependency failed" propagation).
    pub fn dependency_failed() -> Self {
        Self {
            success: false,
            status: NodeStatus::Failed,
            data: None,
            error: Some("dependency failed".to_string()),
            start_time: None,
            end_time: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_carries_data_not_error() {
        let r = NodeResult::completed(1.0, 2.0, json!({"x": 1}));
        assert!(r.success);
        assert_eq!(r.status, NodeStatus::Completed);
        assert!(r.data.is_some());
        assert!(r.error.is_none());
    }

    #[test]
    fn failed_carries_error_not_data() {
        let r = NodeResult::failed(Some(1.0), 2.0, "boom");
        assert!(!r.success);
        assert_eq!(r.status, NodeStatus::Failed);
        assert!(r.data.is_none());
        assert_eq!(r.error.as_deref(), Some("boom"));
    }

    #[test]
    fn dependency_failed_has_fixed_message() {
        let r = NodeResult::dependency_failed();
        assert_eq!(r.error.as_deref(), Some("dependency failed"));
        assert!(!r.success);
    }

    #[test]
    fn running_is_not_terminal() {
        let r = NodeResult::running(1.0);
        assert!(!r.is_terminal());
    }

    #[test]
    fn serializes_without_absent_fields() {
        let r = NodeResult::running(1.0);
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("data").is_none());
        assert!(v.get("error").is_none());
    }
}
