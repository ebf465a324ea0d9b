//! Per-session bounded history (§3 "Agent session history"), grounded on
//! the original's `self._session_history` dict of lists, keyed by
//! `chat_id` and windowed to the last `memory_size` entries when rendered
//! into a prompt.

use std::collections::HashMap;
use tokio::sync::Mutex;

/// Keeps every session's transcript separately; each session's list grows
/// unbounded in storage but is only ever read through a trailing window
/// (`recent`), matching `historic_messages[-self.memory_size:]`.
#[derive(Default)]
pub struct SessionHistory {
    sessions: Mutex<HashMap<String, Vec<String>>>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, session_id: &str, entry: String) {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(session_id.to_string()).or_default().push(entry);
    }

    /// The last `window` entries for `session_id`, oldest first.
    pub async fn recent(&self, session_id: &str, window: usize) -> Vec<String> {
        let sessions = self.sessions.lock().await;
        match sessions.get(session_id) {
            Some(entries) => {
                let start = entries.len().saturating_sub(window);
                entries[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    pub async fn clear(&self, session_id: &str) {
        self.sessions.lock().await.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recent_windows_to_the_trailing_n_entries() {
        let history = SessionHistory::new();
        for i in 0..5 {
            history.append("s1", format!("entry {i}")).await;
        }
        let window = history.recent("s1", 2).await;
        assert_eq!(window, vec!["entry 3".to_string(), "entry 4".to_string()]);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let history = SessionHistory::new();
        history.append("s1", "a".to_string()).await;
        history.append("s2", "b".to_string()).await;
        assert_eq!(history.recent("s1", 10).await, vec!["a".to_string()]);
        assert_eq!(history.recent("s2", 10).await, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn unknown_session_has_empty_history() {
        let history = SessionHistory::new();
        assert!(history.recent("ghost", 5).await.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_a_sessions_history() {
        let history = SessionHistory::new();
        history.append("s1", "a".to_string()).await;
        history.clear("s1").await;
        assert!(history.recent("s1", 5).await.is_empty());
    }
}
