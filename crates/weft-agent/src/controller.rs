//! Bounded ReAct loop (§4.7), grounded on the original's `Agent.run`.

use crate::cache::{CacheConfig, ResponseCache};
use crate::dispatcher;
use crate::error::{AgentError, Result};
use crate::history::SessionHistory;
use crate::metrics::AgentMetrics;
use crate::parse::parse_action;
use crate::prompt::build_prompt;
use crate::tool::ToolSet;
use serde_json::Value;
use std::time::{Duration, Instant};
use weft_llm::{ChatTransport, Message};
use weft_stream::{EventTag, SessionId, StreamEvent, StreamMultiplexer};

/// Tunables for one [`AgentController`] instance (§3 "Agent").
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub instruction: String,
    pub timeout: Duration,
    pub max_iterations: usize,
    pub memory_size: usize,
    pub temperature: f64,
    pub cache: CacheConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instruction: String::new(),
            timeout: Duration::from_secs(30),
            max_iterations: 5,
            memory_size: 10,
            temperature: 0.0,
            cache: CacheConfig::default(),
        }
    }
}

/// Drives one bounded think/act loop over a fixed tool set and LLM
/// transport, emitting lifecycle events into a session's stream (§4.7).
pub struct AgentController {
    config: AgentConfig,
    tools: ToolSet,
    transport: std::sync::Arc<dyn ChatTransport>,
    cache: ResponseCache,
    history: SessionHistory,
    pub metrics: AgentMetrics,
}

impl AgentController {
    pub fn new(config: AgentConfig, tools: ToolSet, transport: std::sync::Arc<dyn ChatTransport>) -> Result<Self> {
        if tools.names().is_empty() {
            return Err(AgentError::ToolNotFound("no tools configured".to_string()));
        }
        Ok(Self {
            cache: ResponseCache::new(config.cache),
            config,
            tools,
            transport,
            history: SessionHistory::new(),
            metrics: AgentMetrics::new(),
        })
    }

    /// Runs the bounded loop for `query` under `session_id`, publishing
    /// `agent_start`/`agent_thinking`/`action_*`/`agent_complete` or
    /// `agent_error` into `mux` as it goes. Returns the final answer text.
    pub async fn run(&self, query: &str, session_id: &SessionId, mux: &StreamMultiplexer) -> Result<String> {
        let _ = mux.publish(session_id, StreamEvent::new(EventTag::AgentStart, query));

        let result = self.run_inner(query, session_id, mux).await;

        match &result {
            Ok(answer) => {
                let _ = mux.publish(session_id, StreamEvent::new(EventTag::AgentComplete, answer.clone()));
            }
            Err(error) => {
                let _ = mux.publish(session_id, StreamEvent::new(EventTag::AgentError, error.to_string()));
            }
        }
        result
    }

    async fn run_inner(&self, query: &str, session_id: &SessionId, mux: &StreamMultiplexer) -> Result<String> {
        let mut scratchpad = String::new();

        for iteration in 1..=self.config.max_iterations {
            let _ = mux.publish(
                session_id,
                StreamEvent::new(EventTag::AgentThinking, format!("iteration {iteration}")),
            );

            let history = self.history.recent(session_id.as_str(), self.config.memory_size).await;
            let prompt = build_prompt(&self.config.instruction, &self.tools, query, &history, &scratchpad);

            let response = match tokio::time::timeout(self.config.timeout, self.call_model(&prompt, session_id)).await {
                Ok(result) => result?,
                Err(_) => return Err(AgentError::Timeout(self.config.timeout)),
            };

            let action = parse_action(&response);

            if action.action == "Final Answer" {
                return Ok(action.action_input_text());
            }

            let Some(tool) = self.tools.get(&action.action) else {
                return Err(AgentError::ToolNotFound(action.action.clone()));
            };

            let _ = mux.publish(
                session_id,
                StreamEvent::json(EventTag::ActionStart, &serde_json::json!({"action": tool.name, "action_input": action.action_input.clone()})),
            );

            let observation = dispatcher::dispatch(tool, action.action_input.clone(), session_id, mux).await?;
            self.metrics.record_tool_usage(&tool.name);

            let _ = mux.publish(
                session_id,
                StreamEvent::json(EventTag::ActionComplete, &serde_json::json!({"action": tool.name, "observation": observation})),
            );

            scratchpad.push_str(&format!(
                "\nAction: {}\nAction Input: {}\nObservation: {}\n",
                tool.name, action.action_input, observation
            ));
            self.history
                .append(session_id.as_str(), format!("Action: {} Observation: {}", tool.name, observation))
                .await;
        }

        Err(AgentError::AgentExhausted(self.config.max_iterations))
    }

    async fn call_model(&self, prompt: &str, session_id: &SessionId) -> Result<String> {
        let exact_key = ResponseCache::exact_key(session_id.as_str(), prompt);
        let semantic_key = ResponseCache::semantic_key(session_id.as_str(), prompt);

        if let Some(cached) = self.cache.get(&exact_key, &semantic_key).await {
            self.metrics.record_cache_access(true, false);
            return Ok(cached);
        }
        self.metrics.record_cache_access(false, false);

        let started = Instant::now();
        let messages = vec![Message::user(prompt)];
        match self.transport.call(messages, session_id.as_str(), self.config.temperature).await {
            Ok(response) => {
                self.metrics.record_call(started.elapsed(), false);
                self.cache.insert(exact_key, semantic_key, response.clone()).await;
                Ok(response)
            }
            Err(error) => {
                self.metrics.record_call(started.elapsed(), true);
                Err(AgentError::Llm(error))
            }
        }
    }
}
