//! The "explanation" stage: an LLM narrates a finished workflow's outcome
//! in prose (§9 Open Question 2 — optional, not on the critical path).
//!
//! Grounded on the original's `WorkflowService.explain_workflow_result`:
//! one line per node ("type(id): success, output=..." or "failed,
//! error=..."), folded into a system prompt, then streamed back as the
//! answer to the caller's original question.

use std::collections::HashMap;
use weft_core::{Graph, NodeResult};
use weft_llm::{ChatTransport, ChunkStream, Message, Result as LlmResult};

/// Streams a prose explanation of `progress` in the context of the
/// original request text. Returns `Err` only on transport failure; the
/// caller decides whether that should end the session or be swallowed
/// since this stage is explicitly non-critical.
pub async fn explain_workflow_result(
    original_text: &str,
    graph: &Graph,
    progress: &HashMap<String, NodeResult>,
    transport: &dyn ChatTransport,
    request_id: &str,
) -> LlmResult<ChunkStream> {
    let summary = summarize(graph, progress);
    let messages = vec![
        Message::system(format!(
            "You are a thorough assistant. Use the context below to answer the user, but never \
             mention that you were given this context.\n\ncontext:\n{summary}"
        )),
        Message::user(original_text.to_string()),
    ];
    transport.stream(messages, request_id).await
}

fn summarize(graph: &Graph, progress: &HashMap<String, NodeResult>) -> String {
    graph
        .nodes
        .iter()
        .map(|node| match progress.get(&node.id) {
            Some(result) if result.success => {
                format!("- {}({}): succeeded, output={}", node.node_type, node.id, result.data.clone().unwrap_or_default())
            }
            Some(result) => {
                format!("- {}({}): failed, error={}", node.node_type, node.id, result.error.clone().unwrap_or_default())
            }
            None => format!("- {}({}): not executed", node.node_type, node.id),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
