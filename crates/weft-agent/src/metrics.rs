//! Agent performance counters, ported from the original's `Metrics` class.
//! Process-wide per-agent instance, read by `weft-api`'s health/status
//! surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::Mutex;

#[derive(Default)]
pub struct AgentMetrics {
    total_calls: AtomicU64,
    total_time_micros: AtomicU64,
    error_count: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    semantic_cache_hits: AtomicU64,
    retry_count: AtomicU64,
    tool_usage: Mutex<HashMap<String, u64>>,
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&self, elapsed: std::time::Duration, is_error: bool) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        self.total_time_micros.fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        if is_error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_tool_usage(&self, tool_name: &str) {
        *self.tool_usage.lock().entry(tool_name.to_string()).or_insert(0) += 1;
    }

    pub fn record_cache_access(&self, hit: bool, semantic: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            if semantic {
                self.semantic_cache_hits.fetch_add(1, Ordering::Relaxed);
            }
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_retry(&self) {
        self.retry_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn average_response_time(&self) -> f64 {
        let calls = self.total_calls.load(Ordering::Relaxed);
        if calls == 0 {
            return 0.0;
        }
        self.total_time_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0 / calls as f64
    }

    pub fn error_rate(&self) -> f64 {
        let calls = self.total_calls.load(Ordering::Relaxed);
        if calls == 0 {
            return 0.0;
        }
        self.error_count.load(Ordering::Relaxed) as f64 / calls as f64
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    pub fn semantic_cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        if hits == 0 {
            return 0.0;
        }
        self.semantic_cache_hits.load(Ordering::Relaxed) as f64 / hits as f64
    }

    pub fn tool_usage_snapshot(&self) -> HashMap<String, u64> {
        self.tool_usage.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn rates_are_zero_before_any_calls() {
        let metrics = AgentMetrics::new();
        assert_eq!(metrics.average_response_time(), 0.0);
        assert_eq!(metrics.error_rate(), 0.0);
        assert_eq!(metrics.cache_hit_rate(), 0.0);
    }

    #[test]
    fn tracks_calls_and_errors() {
        let metrics = AgentMetrics::new();
        metrics.record_call(Duration::from_millis(100), false);
        metrics.record_call(Duration::from_millis(300), true);
        assert_eq!(metrics.error_rate(), 0.5);
        assert!((metrics.average_response_time() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn cache_hit_rate_distinguishes_semantic_hits() {
        let metrics = AgentMetrics::new();
        metrics.record_cache_access(true, false);
        metrics.record_cache_access(true, true);
        metrics.record_cache_access(false, false);
        assert!((metrics.cache_hit_rate() - (2.0 / 3.0)).abs() < 1e-9);
        assert_eq!(metrics.semantic_cache_hit_rate(), 0.5);
    }

    #[test]
    fn tool_usage_counts_by_name() {
        let metrics = AgentMetrics::new();
        metrics.record_tool_usage("search");
        metrics.record_tool_usage("search");
        metrics.record_tool_usage("calc");
        let snapshot = metrics.tool_usage_snapshot();
        assert_eq!(snapshot["search"], 2);
        assert_eq!(snapshot["calc"], 1);
    }
}
