//! Two-tier LLM response cache (§4.7 step 3, P8): an exact cache keyed on
//! `(session_id, prompt)` and a semantic cache keyed on
//! `(session_id, extracted_question, extracted_action)`. A hit on either
//! returns the cached response; a miss inserts into both.
//!
//! Adapted from `langgraph-core::cache::Cache<K, V>`'s entry/TTL/LRU
//! eviction shape, generalized to the two-key lookup the original's
//! `Agent._call_model` performs (`hashlib.md5` there; `sha2::Sha256` here,
//! since no wire compatibility with that cache is required).

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry {
    value: String,
    inserted_at: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub max_size: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_size: 100, ttl: Duration::from_secs(3600) }
    }
}

/// The agent's response cache: exact-match and semantic-match tiers over
/// the same value type, each independently size- and TTL-bounded.
pub struct ResponseCache {
    config: CacheConfig,
    exact: Arc<RwLock<HashMap<String, Entry>>>,
    semantic: Arc<RwLock<HashMap<String, Entry>>>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            exact: Arc::new(RwLock::new(HashMap::new())),
            semantic: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn exact_key(session_id: &str, prompt: &str) -> String {
        hash(&[session_id, prompt])
    }

    /// Extracts the `Question:` and `Action:` lines from a templated
    /// prompt, mirroring the original's `get_semantic_key`.
    pub fn semantic_key(session_id: &str, prompt: &str) -> String {
        let question = extract_after(prompt, "Question:");
        let action = extract_after(prompt, "Action:");
        hash(&[session_id, &question, &action])
    }

    /// A hit on either tier returns the cached value; expired entries are
    /// evicted on access (P8).
    pub async fn get(&self, exact_key: &str, semantic_key: &str) -> Option<String> {
        if let Some(value) = self.get_tier(&self.exact, exact_key).await {
            return Some(value);
        }
        self.get_tier(&self.semantic, semantic_key).await
    }

    async fn get_tier(&self, tier: &Arc<RwLock<HashMap<String, Entry>>>, key: &str) -> Option<String> {
        let mut map = tier.write().await;
        match map.get(key) {
            Some(entry) if entry.is_expired(self.config.ttl) => {
                map.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Inserts into both tiers (a miss path per §4.7 step 3).
    pub async fn insert(&self, exact_key: String, semantic_key: String, value: String) {
        self.insert_tier(&self.exact, exact_key, value.clone()).await;
        self.insert_tier(&self.semantic, semantic_key, value).await;
    }

    async fn insert_tier(&self, tier: &Arc<RwLock<HashMap<String, Entry>>>, key: String, value: String) {
        let mut map = tier.write().await;
        if map.len() >= self.config.max_size && !map.contains_key(&key) {
            if let Some(oldest) = map.iter().min_by_key(|(_, e)| e.inserted_at).map(|(k, _)| k.clone()) {
                map.remove(&oldest);
            }
        }
        map.insert(key, Entry { value, inserted_at: Instant::now() });
    }
}

fn hash(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn extract_after<'a>(text: &'a str, marker: &str) -> &'a str {
    text.find(marker)
        .map(|idx| {
            let rest = &text[idx + marker.len()..];
            rest.lines().next().unwrap_or("").trim()
        })
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exact_hit_returns_cached_value() {
        let cache = ResponseCache::new(CacheConfig::default());
        let exact = ResponseCache::exact_key("s1", "prompt a");
        let semantic = ResponseCache::semantic_key("s1", "prompt a");
        cache.insert(exact.clone(), semantic.clone(), "cached".to_string()).await;
        assert_eq!(cache.get(&exact, &semantic).await, Some("cached".to_string()));
    }

    #[tokio::test]
    async fn semantic_hit_when_question_and_action_match() {
        let cache = ResponseCache::new(CacheConfig::default());
        let prompt1 = "Question: what is 2+2\nAction: calc\n";
        let prompt2 = "Question: what is 2+2\nAction: calc\nextra context";
        let exact1 = ResponseCache::exact_key("s1", prompt1);
        let semantic1 = ResponseCache::semantic_key("s1", prompt1);
        cache.insert(exact1, semantic1, "four".to_string()).await;

        let exact2 = ResponseCache::exact_key("s1", prompt2);
        let semantic2 = ResponseCache::semantic_key("s1", prompt2);
        assert_eq!(cache.get(&exact2, &semantic2).await, Some("four".to_string()));
    }

    #[tokio::test]
    async fn expired_entry_is_evicted_on_access() {
        let cache = ResponseCache::new(CacheConfig { max_size: 10, ttl: Duration::from_millis(20) });
        let exact = ResponseCache::exact_key("s1", "p");
        let semantic = ResponseCache::semantic_key("s1", "p");
        cache.insert(exact.clone(), semantic.clone(), "v".to_string()).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get(&exact, &semantic).await, None);
    }

    #[tokio::test]
    async fn different_sessions_do_not_share_cache_entries() {
        let cache = ResponseCache::new(CacheConfig::default());
        let exact1 = ResponseCache::exact_key("s1", "same prompt");
        let semantic1 = ResponseCache::semantic_key("s1", "same prompt");
        cache.insert(exact1, semantic1, "v1".to_string()).await;

        let exact2 = ResponseCache::exact_key("s2", "same prompt");
        let semantic2 = ResponseCache::semantic_key("s2", "same prompt");
        assert_eq!(cache.get(&exact2, &semantic2).await, None);
    }
}
