//! One concrete HTTP provider against an OpenAI-compatible
//! `/chat/completions` endpoint (§6 "LLM transport contract").
//!
//! Grounded on `llm/src/remote/openai.rs`'s request/response shape and
//! the original's `call_llm_api`/`call_llm_api_stream` retry-and-select
//! flow. One provider is implemented rather than the teacher's full
//! local/remote matrix, since the spec names one transport contract.

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use crate::message::Message;
use crate::transport::{ChatTransport, ChunkStream};
use crate::truncate::{select_model, truncate_oversize};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct ChatRequestBody {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

/// An HTTP-backed [`ChatTransport`] for one OpenAI-compatible endpoint.
pub struct HttpChatTransport {
    config: LlmConfig,
    client: Client,
}

impl HttpChatTransport {
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }

    async fn call_once(&self, messages: &[Message], request_id: &str, temperature: f64) -> Result<String> {
        let model = select_model(messages, &self.config);
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(request_id, model, "calling llm transport");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&ChatRequestBody {
                model,
                messages: messages.to_vec(),
                stream: false,
                temperature: Some(temperature),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::BadResponse { status: status.as_u16(), body });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn call(&self, messages: Vec<Message>, request_id: &str, temperature: f64) -> Result<String> {
        let messages = truncate_oversize(messages);

        let mut last_err = None;
        for attempt in 0..self.config.max_retries {
            match self.call_once(&messages, request_id, temperature).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt + 1 < self.config.max_retries => {
                    warn!(request_id, attempt, error = %e, "llm call failed, retrying");
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_millis(200 * 2u64.pow(attempt))).await;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| LlmError::Other("exhausted retries".to_string())))
    }

    async fn stream(&self, messages: Vec<Message>, request_id: &str) -> Result<ChunkStream> {
        let messages = truncate_oversize(messages);
        let model = select_model(&messages, &self.config);
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&ChatRequestBody {
                model,
                messages,
                stream: true,
                temperature: None,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::BadResponse { status: status.as_u16(), body });
        }

        let request_id = request_id.to_string();
        let byte_stream = response.bytes_stream();
        let chunk_stream = byte_stream
            .map(move |chunk| -> Vec<Result<String>> {
                let bytes = match chunk {
                    Ok(b) => b,
                    Err(e) => return vec![Err(LlmError::Http(e))],
                };
                let text = String::from_utf8_lossy(&bytes);
                text.lines()
                    .filter_map(|line| parse_sse_line(line, &request_id).transpose())
                    .collect()
            })
            .flat_map(futures::stream::iter);

        Ok(Box::pin(chunk_stream))
    }
}

fn parse_sse_line(line: &str, request_id: &str) -> Result<Option<String>> {
    let line = line.trim();
    if !line.starts_with("data: ") {
        return Ok(None);
    }
    let payload = &line[6..];
    if payload == "[DONE]" {
        return Ok(None);
    }
    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => Ok(chunk.choices.into_iter().next().and_then(|c| c.delta.content)),
        Err(e) => {
            warn!(request_id, error = %e, "failed to decode stream chunk, skipping");
            Ok(None)
        }
    }
}
