//! Fetches a URL over HTTP, the Rust-native counterpart to the original's
//! `aiohttp`-based fetch-style nodes (`web_scrape.py`/`web_crawler.py`):
//! this crate implements the minimal `GET -> {status, body}` shape those
//! modules build on, without the HTML-parsing layer above it (§9
//! "Non-goals" excludes a browser/rendering pipeline).

use crate::error::NodeError;
use async_trait::async_trait;
use serde_json::{json, Value};
use weft_core::{NodeDescriptor, ParamSpec};
use weft_node::{NodeBody, NodeContext, NodeOutput};

pub struct HttpFetchNode {
    client: reqwest::Client,
}

impl Default for HttpFetchNode {
    fn default() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

#[async_trait]
impl NodeBody for HttpFetchNode {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let url = params
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| NodeError::MissingParam("url".to_string()).to_string())?;

        let response = self.client.get(url).send().await.map_err(|e| NodeError::Http(e).to_string())?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| NodeError::Http(e).to_string())?;

        Ok(NodeOutput::terminal(json!({
            "status": status,
            "body": body,
            "success": (200..300).contains(&status),
        })))
    }
}

pub fn descriptor() -> NodeDescriptor {
    NodeDescriptor::new("http_fetch", "HTTP Fetch")
        .with_description("fetches a URL and returns its status and body")
        .with_param("url", ParamSpec::new("string", "the URL to fetch").required())
        .with_output("status", "HTTP status code")
        .with_output("body", "response body text")
        .with_output("success", "whether status was 2xx")
}
