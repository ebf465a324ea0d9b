//! LLM transport error taxonomy (§7 "Transport").

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API key not configured: {0}")]
    ApiKeyMissing(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("non-2xx response ({status}): {body}")]
    BadResponse { status: u16, body: String },

    #[error("invalid response shape: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}

impl LlmError {
    /// Whether a failed attempt is worth retrying (§6 "Retries: up to 3
    /// attempts on any transport failure" — the spec retries unconditionally,
    /// so every variant is retryable except a missing API key, which no
    /// retry will fix).
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::ApiKeyMissing(_))
    }
}
