//! Serper web search node, grounded on
//! `original_source/src/nodes/serper_search.py`: posts `{q, gl, hl}` to
//! `google.serper.dev/search`, flattens an optional answer box and the
//! organic results into one ordered list. Unlike the original, transport
//! failures surface as `Err` (propagated to the scheduler's `FAILED`
//! terminal result, §4.4) rather than a `success: false` payload — the
//! original's blanket `except Exception` swallowed network errors the
//! same way a missing API key was reported, which this crate's node
//! contract already distinguishes by returning `Result`.

use crate::error::NodeError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use weft_core::{NodeDescriptor, ParamSpec};
use weft_node::{NodeBody, NodeContext, NodeOutput};

const ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Deserialize, Default)]
struct SerperResponse {
    #[serde(rename = "answerBox")]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct AnswerBox {
    #[serde(default)]
    title: String,
    #[serde(default)]
    answer: String,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperSearchNode {
    api_key: String,
    client: reqwest::Client,
}

impl SerperSearchNode {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), client: reqwest::Client::new() }
    }

    /// Builds the node from `SERPER_API_KEY`, per §6's configuration
    /// surface. Returns `None` when unset, so callers can skip
    /// registering the tool entirely rather than registering one that
    /// always fails.
    pub fn from_env() -> Option<Self> {
        weft_tooling::env::get_env("SERPER_API_KEY").ok().flatten().map(Self::new)
    }
}

#[async_trait]
impl NodeBody for SerperSearchNode {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let query = params.get("query").and_then(Value::as_str).unwrap_or("");
        if query.is_empty() {
            return Err(NodeError::MissingParam("query".to_string()).to_string());
        }
        let country = params.get("country").and_then(Value::as_str).unwrap_or("cn");
        let language = params.get("language").and_then(Value::as_str).unwrap_or("zh");

        let response = self
            .client
            .post(ENDPOINT)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({"q": query, "gl": country, "hl": language}))
            .send()
            .await
            .map_err(|e| NodeError::Http(e).to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NodeError::Other(format!("serper request failed ({status}): {body}")).to_string());
        }

        let parsed: SerperResponse = response.json().await.map_err(|e| NodeError::Http(e).to_string())?;
        let mut results = Vec::new();
        if let Some(answer_box) = parsed.answer_box {
            results.push(json!({
                "title": answer_box.title,
                "link": "",
                "snippet": answer_box.answer,
                "is_answer_box": true,
            }));
        }
        for result in parsed.organic {
            results.push(json!({"title": result.title, "link": result.link, "snippet": result.snippet}));
        }

        Ok(NodeOutput::terminal(json!({
            "success": true,
            "error": Value::Null,
            "count": results.len(),
            "results": results,
        })))
    }
}

pub fn descriptor() -> NodeDescriptor {
    NodeDescriptor::new("serper_search", "Serper Search")
        .with_description("web search via the Serper API")
        .with_param("query", ParamSpec::new("string", "search query").required())
        .with_param("country", ParamSpec::new("string", "gl country code, default cn"))
        .with_param("language", ParamSpec::new("string", "hl language code, default zh"))
        .with_output("results", "ordered list of {title, link, snippet}")
        .with_output("count", "number of results returned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let node = SerperSearchNode::new("test-key");
        let err = node.invoke(json!({"query": ""}), &NodeContext::new()).await.unwrap_err();
        assert!(err.contains("query"));
    }
}
