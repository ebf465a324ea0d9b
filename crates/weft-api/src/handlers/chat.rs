//! `POST /chat` — creates a session, launches one of the two producers
//! (workflow synthesizer + DAG scheduler, or agent loop), and returns
//! immediately (§6).

use crate::error::Result;
use crate::models::{ChatModel, ChatRequest, ChatResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use futures::StreamExt;
use std::collections::HashMap;
use weft_core::Graph;
use weft_llm::Message;
use weft_stream::{EventTag, SessionId, StreamEvent};

pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Result<Json<ChatResponse>> {
    let session_id = SessionId::generate();

    match request.model {
        ChatModel::Workflow => {
            state.mux.create(session_id.clone())?;
            spawn_workflow_producer(state.clone(), session_id.clone(), request.text);
        }
        ChatModel::Agent => {
            state.mux.create(session_id.clone())?;
            spawn_agent_producer(state.clone(), session_id.clone(), request.text);
        }
    }

    Ok(Json(ChatResponse { success: true, chat_id: session_id.to_string() }))
}

/// Synthesizes a graph from `text` (§2 "workflow synthesizer"), executes
/// it if one was generated, narrates the outcome, then falls back to a
/// plain LLM answer when the request needed no workflow at all — mirroring
/// the original's `if not workflow.get("nodes")` branch.
fn spawn_workflow_producer(state: AppState, session_id: SessionId, text: String) {
    tokio::spawn(async move {
        let request_id = session_id.to_string();

        let _ = state.mux.publish(&session_id, StreamEvent::status("generating"));
        let graph = weft_engine::synthesize_workflow(&text, &state.registry, state.transport.as_ref(), &request_id).await;

        if graph.nodes.is_empty() {
            run_plain_answer(&state, &session_id, &text, &request_id).await;
            return;
        }

        if let Err(error) = weft_engine::validate_graph(&graph, &state.registry) {
            let _ = state.mux.publish(&session_id, StreamEvent::error(error.to_string()));
            return;
        }

        let _ = state.mux.publish(&session_id, StreamEvent::json(EventTag::Workflow, &graph));
        let _ = state.mux.publish(&session_id, StreamEvent::status("executing"));

        let (_handle, mut events) = state.scheduler.run_stream(graph.clone(), HashMap::new());
        let mut progress = HashMap::new();
        while let Some((node_id, result)) = events.next().await {
            let wire = crate::models::NodeResultWire::from_result(node_id.clone(), &result);
            let _ = state.mux.publish(&session_id, StreamEvent::json(EventTag::NodeResult, &wire));
            progress.insert(node_id, result);
        }

        run_explanation(&state, &session_id, &text, &graph, &progress, &request_id).await;
        let _ = state.mux.publish(&session_id, StreamEvent::complete());
    });
}

/// The request needed no workflow: answer it directly with the LLM,
/// streaming chunks as `answer` events.
async fn run_plain_answer(state: &AppState, session_id: &SessionId, text: &str, request_id: &str) {
    let _ = state.mux.publish(session_id, StreamEvent::status("answering"));
    let messages = vec![
        Message::system("Answer the user's question concisely and accurately."),
        Message::user(text.to_string()),
    ];
    match state.transport.stream(messages, request_id).await {
        Ok(mut chunks) => {
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(text) => {
                        let _ = state.mux.publish(session_id, StreamEvent::new(EventTag::Answer, text));
                    }
                    Err(error) => {
                        let _ = state.mux.publish(session_id, StreamEvent::error(error.to_string()));
                        return;
                    }
                }
            }
            let _ = state.mux.publish(session_id, StreamEvent::complete());
        }
        Err(error) => {
            let _ = state.mux.publish(session_id, StreamEvent::error(error.to_string()));
        }
    }
}

/// Narrates the finished workflow's outcome (§9 Open Question 2): best
/// effort, since the explanation stage is optional and never blocks the
/// terminal `complete` event that follows it.
async fn run_explanation(
    state: &AppState,
    session_id: &SessionId,
    text: &str,
    graph: &Graph,
    progress: &HashMap<String, weft_core::NodeResult>,
    request_id: &str,
) {
    match weft_engine::explain_workflow_result(text, graph, progress, state.transport.as_ref(), request_id).await {
        Ok(mut chunks) => {
            while let Some(chunk) = chunks.next().await {
                if let Ok(text) = chunk {
                    let _ = state.mux.publish(session_id, StreamEvent::new(EventTag::Explanation, text));
                }
            }
        }
        Err(_) => {
            // Explanation is best-effort and not on the critical path (§9 Open Question 2).
        }
    }
}

fn spawn_agent_producer(state: AppState, session_id: SessionId, query: String) {
    tokio::spawn(async move {
        // `AgentController::run` already publishes `agent_complete` carrying
        // the answer (§4.7 step 5, scenario 6); only the terminal `complete`
        // remains to be published here.
        match state.agent.run(&query, &session_id, &state.mux).await {
            Ok(_answer) => {
                let _ = state.mux.publish(&session_id, StreamEvent::complete());
            }
            Err(error) => {
                let _ = state.mux.publish(&session_id, StreamEvent::error(error.to_string()));
            }
        }
    });
}
