//! Model selection and the oversize-content truncation guard (§6 "LLM
//! transport contract").

use crate::config::LlmConfig;
use crate::Message;

/// Total character length of a message list's `role` + `content` (the
/// original's `calculate_messages_length`).
pub fn messages_length(messages: &[Message]) -> usize {
    messages
        .iter()
        .map(|m| m.role.len() + m.content.len())
        .sum()
}

/// `MODEL_NAME` unless the summed length exceeds
/// `CONTEXT_LENGTH_THRESHOLD`, in which case `LONG_CONTEXT_MODEL`.
pub fn select_model(messages: &[Message], config: &LlmConfig) -> String {
    if messages_length(messages) > config.context_length_threshold {
        config.long_context_model.clone()
    } else {
        config.model_name.clone()
    }
}

const MAX_TOTAL_CHARS: usize = 100_000;

/// If the summed length exceeds 100,000 characters, proportionally
/// truncates only `user`-role contents, preserving at least half of each,
/// until the budget is met (§6 "Oversize guard").
pub fn truncate_oversize(messages: Vec<Message>) -> Vec<Message> {
    let total = messages_length(&messages);
    if total <= MAX_TOTAL_CHARS {
        return messages;
    }

    let excess = total - MAX_TOTAL_CHARS;
    let user_count = messages.iter().filter(|m| m.role == "user" && !m.content.is_empty()).count();
    if user_count == 0 {
        return messages;
    }
    let per_message = excess / user_count;

    messages
        .into_iter()
        .map(|mut m| {
            if m.role == "user" && !m.content.is_empty() {
                let keep = (m.content.len().saturating_sub(per_message)).max(m.content.len() / 2);
                let boundary = floor_char_boundary(&m.content, keep);
                m.content.truncate(boundary);
            }
            m
        })
        .collect()
}

/// The largest index `<= keep` that lands on a UTF-8 char boundary, so
/// `content.truncate(..)` never panics on multi-byte input.
fn floor_char_boundary(content: &str, keep: usize) -> usize {
    if keep >= content.len() {
        return content.len();
    }
    (0..=keep).rev().find(|&i| content.is_char_boundary(i)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: &str, content: &str) -> Message {
        Message { role: role.to_string(), content: content.to_string() }
    }

    fn config(threshold: usize) -> LlmConfig {
        LlmConfig {
            api_key: "k".to_string(),
            base_url: "http://x".to_string(),
            model_name: "short".to_string(),
            long_context_model: "long".to_string(),
            context_length_threshold: threshold,
            timeout: std::time::Duration::from_secs(1),
            max_retries: 3,
        }
    }

    #[test]
    fn selects_short_model_under_threshold() {
        let messages = vec![msg("user", "hi")];
        assert_eq!(select_model(&messages, &config(1000)), "short");
    }

    #[test]
    fn selects_long_context_model_over_threshold() {
        let messages = vec![msg("user", &"x".repeat(2000))];
        assert_eq!(select_model(&messages, &config(1000)), "long");
    }

    #[test]
    fn under_budget_passes_through_unchanged() {
        let messages = vec![msg("user", "small")];
        let out = truncate_oversize(messages.clone());
        assert_eq!(out[0].content, messages[0].content);
    }

    #[test]
    fn truncates_only_user_messages_preserving_half() {
        let user_content = "a".repeat(200_000);
        let messages = vec![
            msg("system", &"s".repeat(10)),
            msg("user", &user_content),
        ];
        let out = truncate_oversize(messages);
        assert_eq!(out[0].content.len(), 10);
        assert!(out[1].content.len() >= user_content.len() / 2);
        assert!(out[1].content.len() < user_content.len());
    }

    #[test]
    fn no_user_messages_returns_unmodified() {
        let messages = vec![msg("system", &"s".repeat(200_000))];
        let out = truncate_oversize(messages.clone());
        assert_eq!(out[0].content, messages[0].content);
    }
}
