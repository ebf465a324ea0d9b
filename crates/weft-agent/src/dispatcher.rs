//! Retry envelope around a single tool invocation (§4.8), grounded on
//! the original's `Agent._execute_tool` retry loop
//! (`retry_count <= tool.max_retries`, `asyncio.sleep(tool.retry_delay)`,
//! `tool_retry` event emission).

use crate::error::{AgentError, Result};
use crate::tool::AgentTool;
use serde_json::Value;
use weft_stream::{EventTag, SessionId, StreamEvent, StreamMultiplexer};

/// Invokes `tool` with `action_input`, retrying on failure up to
/// `tool.max_retries` additional attempts with `tool.retry_delay` seconds
/// between them. Each attempt publishes `tool_progress`; each failed
/// attempt but the last publishes `tool_retry`; exhaustion raises
/// [`AgentError::ToolExecution`].
pub async fn dispatch(
    tool: &AgentTool,
    action_input: Value,
    session_id: &SessionId,
    mux: &StreamMultiplexer,
) -> Result<Value> {
    let max_attempts = tool.max_retries + 1;
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        let _ = mux.publish(
            session_id,
            StreamEvent::json(
                EventTag::ToolProgress,
                &serde_json::json!({"tool": tool.name, "attempt": attempt, "max_attempts": max_attempts}),
            ),
        );

        match tool.invoke(action_input.clone()).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                last_error = error;
                if attempt < max_attempts {
                    let _ = mux.publish(
                        session_id,
                        StreamEvent::json(
                            EventTag::ToolRetry,
                            &serde_json::json!({
                                "tool": tool.name,
                                "attempt": attempt,
                                "max_attempts": max_attempts,
                                "error": last_error,
                            }),
                        ),
                    );
                    tokio::time::sleep(std::time::Duration::from_secs_f64(tool.retry_delay)).await;
                }
            }
        }
    }

    Err(AgentError::ToolExecution {
        tool: tool.name.clone(),
        attempts: max_attempts,
        error: last_error,
    })
}
