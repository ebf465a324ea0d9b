//! Node and workflow execution status, and their legal transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single node's execution.
///
/// Transitions: `Pending -> Running -> {Completed | Failed}`. No other
/// transition is legal; a node never leaves `Completed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl NodeStatus {
    /// Terminal statuses end a node's lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeStatus::Completed | NodeStatus::Failed)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: NodeStatus) -> bool {
        matches!(
            (self, next),
            (NodeStatus::Pending, NodeStatus::Running)
                | (NodeStatus::Running, NodeStatus::Running)
                | (NodeStatus::Running, NodeStatus::Completed)
                | (NodeStatus::Running, NodeStatus::Failed)
        )
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeStatus::Pending => "pending",
            NodeStatus::Running => "running",
            NodeStatus::Completed => "completed",
            NodeStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Status of an entire workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl WorkflowStatus {
    /// A terminal status is never left.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::Cancelled
        )
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Running => "running",
            WorkflowStatus::Paused => "paused",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_status_legal_transitions() {
        assert!(NodeStatus::Pending.can_transition_to(NodeStatus::Running));
        assert!(NodeStatus::Running.can_transition_to(NodeStatus::Completed));
        assert!(NodeStatus::Running.can_transition_to(NodeStatus::Failed));
        assert!(NodeStatus::Running.can_transition_to(NodeStatus::Running));
    }

    #[test]
    fn node_status_illegal_transitions() {
        assert!(!NodeStatus::Pending.can_transition_to(NodeStatus::Completed));
        assert!(!NodeStatus::Completed.can_transition_to(NodeStatus::Running));
        assert!(!NodeStatus::Failed.can_transition_to(NodeStatus::Running));
        assert!(!NodeStatus::Pending.can_transition_to(NodeStatus::Failed));
    }

    #[test]
    fn node_status_terminal() {
        assert!(NodeStatus::Completed.is_terminal());
        assert!(NodeStatus::Failed.is_terminal());
        assert!(!NodeStatus::Running.is_terminal());
        assert!(!NodeStatus::Pending.is_terminal());
    }

    #[test]
    fn workflow_status_terminal() {
        assert!(WorkflowStatus::Completed.is_terminal());
        assert!(WorkflowStatus::Failed.is_terminal());
        assert!(WorkflowStatus::Cancelled.is_terminal());
        assert!(!WorkflowStatus::Paused.is_terminal());
        assert!(!WorkflowStatus::Running.is_terminal());
    }

    #[test]
    fn display_matches_wire_code() {
        assert_eq!(NodeStatus::Running.to_string(), "running");
        assert_eq!(WorkflowStatus::Cancelled.to_string(), "cancelled");
    }
}
