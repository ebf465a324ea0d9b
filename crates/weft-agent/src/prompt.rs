//! ReAct prompt assembly (§4.7 step 1), grounded on the original's
//! `Agent._construct_prompt` / `COT_COMPLETION_PROMPT_TEMPLATES`.

use crate::tool::ToolSet;

const TEMPLATE: &str = "Follow the instruction and use tools step by step:\n\
{instruction}\n\
Available tools:\n\
{tools}\n\
Available tool names:\n\
\"Final Answer\" or {tool_names}\n\n\
Respond with a single JSON action per step:\n\
```\n\
{{\"action\": \"tool name\", \"action_input\": \"tool input\"}}\n\
```\n\n\
When you have the final answer, respond with:\n\
```\n\
{{\"action\": \"Final Answer\", \"action_input\": \"final answer text\"}}\n\
```\n\n\
Recent history:\n\
{history}\n\n\
Question: {query}\n\
{scratchpad}";

/// Assembles one iteration's prompt from the instruction, tool list, tool
/// name enumeration, query, a bounded history window, and the scratchpad.
pub fn build_prompt(
    instruction: &str,
    tools: &ToolSet,
    query: &str,
    history: &[String],
    scratchpad: &str,
) -> String {
    let tools_desc = tools.iter().map(|t| t.describe()).collect::<Vec<_>>().join("\n");
    let tool_names = tools.names().join(", ");
    let history_desc = history.join("\n");

    TEMPLATE
        .replace("{instruction}", instruction)
        .replace("{tools}", &tools_desc)
        .replace("{tool_names}", &tool_names)
        .replace("{history}", &history_desc)
        .replace("{query}", query)
        .replace("{scratchpad}", scratchpad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::AgentTool;
    use std::sync::Arc;
    use weft_core::NodeDescriptor;
    use weft_node::NodeRegistry;

    #[test]
    fn prompt_contains_query_and_tool_names() {
        let mut reg = NodeRegistry::new();
        reg.register(NodeDescriptor::new("search", "Search").with_description("web search"), || {
            use async_trait::async_trait;
            struct Noop;
            #[async_trait]
            impl weft_node::NodeBody for Noop {
                async fn invoke(&self, p: serde_json::Value, _c: &weft_node::NodeContext) -> Result<weft_node::NodeOutput, String> {
                    Ok(weft_node::NodeOutput::terminal(p))
                }
            }
            Arc::new(Noop)
        })
        .unwrap();
        let registry = Arc::new(reg);
        let descriptor = registry.descriptor("search").unwrap().clone();
        let tools = ToolSet::new(vec![AgentTool::from_descriptor(descriptor, registry)]);

        let prompt = build_prompt("be helpful", &tools, "what is rust?", &[], "");
        assert!(prompt.contains("what is rust?"));
        assert!(prompt.contains("search"));
        assert!(prompt.contains("Final Answer"));
    }

    #[test]
    fn question_line_extractable_for_semantic_cache() {
        let prompt = build_prompt("be helpful", &ToolSet::default(), "2+2?", &[], "");
        assert!(prompt.contains("Question: 2+2?"));
    }
}
