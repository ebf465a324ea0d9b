//! The wire event envelope and closed tag set (§6 "SSE event envelope").

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of SSE event tags a session stream may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    Status,
    Workflow,
    NodeResult,
    Explanation,
    Answer,
    Complete,
    Error,
    ActionStart,
    ActionComplete,
    ToolProgress,
    ToolRetry,
    AgentStart,
    AgentComplete,
    AgentError,
    AgentThinking,
}

impl EventTag {
    /// `complete` and `error` are the only terminal tags; exactly one ends
    /// a session (§3 "Session stream", §6 "Terminal-state events").
    pub fn is_terminal(self) -> bool {
        matches!(self, EventTag::Complete | EventTag::Error)
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventTag::Status => "status",
            EventTag::Workflow => "workflow",
            EventTag::NodeResult => "node_result",
            EventTag::Explanation => "explanation",
            EventTag::Answer => "answer",
            EventTag::Complete => "complete",
            EventTag::Error => "error",
            EventTag::ActionStart => "action_start",
            EventTag::ActionComplete => "action_complete",
            EventTag::ToolProgress => "tool_progress",
            EventTag::ToolRetry => "tool_retry",
            EventTag::AgentStart => "agent_start",
            EventTag::AgentComplete => "agent_complete",
            EventTag::AgentError => "agent_error",
            EventTag::AgentThinking => "agent_thinking",
        };
        write!(f, "{}", s)
    }
}

/// One event in a session stream. `data` is a raw string for
/// status/explanation/answer-style tags and a JSON string for everything
/// else, per §6 — the multiplexer treats `data` as an opaque string either
/// way and leaves the choice of encoding to the producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEvent {
    pub event: EventTag,
    pub data: String,
}

impl StreamEvent {
    pub fn new(event: EventTag, data: impl Into<String>) -> Self {
        Self {
            event,
            data: data.into(),
        }
    }

    pub fn status(data: impl Into<String>) -> Self {
        Self::new(EventTag::Status, data)
    }

    pub fn complete() -> Self {
        Self::new(EventTag::Complete, "done")
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EventTag::Error, message)
    }

    pub fn is_terminal(&self) -> bool {
        self.event.is_terminal()
    }

    /// Build a JSON-encoded event from any serializable payload, e.g. a
    /// [`weft_core::NodeResult`]'s wire form.
    pub fn json(event: EventTag, payload: &impl Serialize) -> Self {
        let data = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
        Self::new(event, data)
    }
}
