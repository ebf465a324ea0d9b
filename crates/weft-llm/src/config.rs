//! Configuration surface for the LLM transport (§6 "Configuration surface").

use crate::error::{LlmError, Result};
use std::time::Duration;

/// `API_KEY`, `BASE_URL`, `MODEL_NAME`, `LONG_CONTEXT_MODEL`,
/// `CONTEXT_LENGTH_THRESHOLD` — loaded once at startup.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
    pub long_context_model: String,
    pub context_length_threshold: usize,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl LlmConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("API_KEY")
            .map_err(|_| LlmError::ApiKeyMissing("API_KEY".to_string()))?;
        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model_name = std::env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4".to_string());
        let long_context_model = std::env::var("LONG_CONTEXT_MODEL")
            .unwrap_or_else(|_| model_name.clone());
        let context_length_threshold = std::env::var("CONTEXT_LENGTH_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8_000);

        Ok(Self {
            api_key,
            base_url,
            model_name,
            long_context_model,
            context_length_threshold,
            timeout: Duration::from_secs(30),
            max_retries: 3,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_fails() {
        std::env::remove_var("API_KEY");
        assert!(LlmConfig::from_env().is_err());
    }
}
