//! Agent error taxonomy (§7 "Agent").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("tool {tool} failed after {attempts} attempts: {error}")]
    ToolExecution {
        tool: String,
        attempts: u32,
        error: String,
    },

    #[error("agent exhausted {0} iterations without a final answer")]
    AgentExhausted(usize),

    #[error("llm call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error(transparent)]
    Llm(#[from] weft_llm::LlmError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
