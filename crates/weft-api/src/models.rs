//! Wire request/response shapes for the HTTP surface (§6).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use weft_core::{Graph, NodeResult};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Which producer a `/chat` call launches: a session running the DAG
/// scheduler against a supplied workflow graph, or one running the
/// bounded agent loop against free text (§6 "model ∈ {workflow, agent}").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatModel {
    Workflow,
    Agent,
}

/// `POST /chat` body. For `model: workflow`, `text` is a natural-language
/// request that the workflow synthesizer turns into a graph before
/// execution; for `model: agent`, `text` is the agent's query verbatim
/// (§4.7, §6).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    pub model: ChatModel,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteWorkflowRequest {
    pub workflow: Graph,
    #[serde(default)]
    pub global_params: HashMap<String, Value>,
}

/// `{node_id, success, status, data|null, error|null}` (§6 "Node result
/// envelope").
#[derive(Debug, Clone, Serialize)]
pub struct NodeResultWire {
    pub node_id: String,
    pub success: bool,
    pub status: weft_core::NodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NodeResultWire {
    pub fn from_result(node_id: impl Into<String>, result: &NodeResult) -> Self {
        Self {
            node_id: node_id.into(),
            success: result.success,
            status: result.status,
            data: result.data.clone(),
            error: result.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteWorkflowResponse {
    pub events: Vec<Value>,
}
