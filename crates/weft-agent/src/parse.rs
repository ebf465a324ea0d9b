//! Parses the model's response into an action (§4.7 step 2), grounded on
//! the original's `_parse_action`: extract the fenced code block if
//! present, then parse it as a JSON `{"action", "action_input"}` object.
//! A response that fails to parse becomes a synthetic `Final Answer`
//! carrying the parse error, rather than aborting the loop.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedAction {
    pub action: String,
    #[serde(default)]
    pub action_input: Value,
}

impl ParsedAction {
    /// Renders `action_input` as prompt-ready text: passes strings through
    /// unchanged, stringifies everything else.
    pub fn action_input_text(&self) -> String {
        match &self.action_input {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Extracts the fenced ```...``` block if one is present (the model may
/// wrap its JSON answer in markdown), then parses it as an action object.
pub fn parse_action(response: &str) -> ParsedAction {
    let body = extract_fenced_block(response).unwrap_or(response);

    match serde_json::from_str::<ParsedAction>(body.trim()) {
        Ok(action) => action,
        Err(error) => ParsedAction {
            action: "Final Answer".to_string(),
            action_input: Value::String(format!("Error parsing response: {error}")),
        },
    }
}

fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_open = &text[start + 3..];
    let after_open = after_open.strip_prefix("json").unwrap_or(after_open);
    let end = after_open.find("```")?;
    Some(&after_open[..end])
}
