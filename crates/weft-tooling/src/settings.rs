//! Process-wide settings assembled from the environment (§6 "Configuration
//! surface"). Every field has a typed default, so startup never fails on
//! a missing variable except `API_KEY`, which lives in `weft-llm` since
//! only that crate requires it.

use crate::env::get_env_parse_or;
use crate::error::Result;
use std::time::Duration;

/// Knobs the ambient stack reads beyond the LLM transport's own
/// `LlmConfig` (which owns `API_KEY`/`BASE_URL`/`MODEL_NAME`/etc.).
#[derive(Debug, Clone)]
pub struct Settings {
    pub worker_pool_size: usize,
    pub session_idle_timeout: Duration,
    pub agent_max_iterations: usize,
    pub agent_memory_size: usize,
    pub agent_cache_size: usize,
    pub agent_cache_ttl: Duration,
    pub log_file_path: Option<String>,
    pub config_path: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            worker_pool_size: get_env_parse_or("WORKER_POOL_SIZE", 4usize)?,
            session_idle_timeout: Duration::from_secs(get_env_parse_or("SESSION_IDLE_TIMEOUT", 300u64)?),
            agent_max_iterations: get_env_parse_or("AGENT_MAX_ITERATIONS", 5usize)?,
            agent_memory_size: get_env_parse_or("AGENT_MEMORY_SIZE", 10usize)?,
            agent_cache_size: get_env_parse_or("AGENT_CACHE_SIZE", 100usize)?,
            agent_cache_ttl: Duration::from_secs(get_env_parse_or("AGENT_CACHE_TTL", 3600u64)?),
            log_file_path: crate::env::get_env("LOG_FILE_PATH")?,
            config_path: crate::env::get_env("WEFT_CONFIG")?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worker_pool_size: 4,
            session_idle_timeout: Duration::from_secs(300),
            agent_max_iterations: 5,
            agent_memory_size: 10,
            agent_cache_size: 100,
            agent_cache_ttl: Duration::from_secs(3600),
            log_file_path: None,
            config_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.worker_pool_size, 4);
        assert_eq!(settings.session_idle_timeout, Duration::from_secs(300));
        assert_eq!(settings.agent_max_iterations, 5);
        assert_eq!(settings.agent_cache_ttl, Duration::from_secs(3600));
    }
}
