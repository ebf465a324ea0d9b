//! `POST /execute_workflow` — synchronous collect entry point, grounded
//! on the original's `execute_workflow` handler's event-array response
//! shape (§6).

use crate::error::Result;
use crate::models::{ExecuteWorkflowRequest, ExecuteWorkflowResponse, NodeResultWire};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::json;

pub async fn execute_workflow(
    State(state): State<AppState>,
    Json(request): Json<ExecuteWorkflowRequest>,
) -> Result<Json<ExecuteWorkflowResponse>> {
    weft_engine::validate_graph(&request.workflow, &state.registry)?;

    let (_handle, results) = state.scheduler.run_collect(request.workflow, request.global_params).await;

    let mut events: Vec<serde_json::Value> = results
        .iter()
        .map(|(node_id, result)| {
            json!({
                "event": "node_result",
                "data": NodeResultWire::from_result(node_id.clone(), result),
            })
        })
        .collect();
    events.push(json!({"event": "complete", "data": "done"}));

    Ok(Json(ExecuteWorkflowResponse { events }))
}
