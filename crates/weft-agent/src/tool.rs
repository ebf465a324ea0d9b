//! The agent's view of a node: a node descriptor surfaced to the agent
//! with retry metadata (§3 "Agent tool").

use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use weft_core::NodeDescriptor;
use weft_node::{NodeContext, NodeOutput, NodeRegistry};

/// Binds one registered node type into the agent's tool set. Lifetime
/// equals the agent process lifetime (§3).
#[derive(Clone)]
pub struct AgentTool {
    pub name: String,
    pub description: String,
    pub descriptor: NodeDescriptor,
    pub is_async: bool,
    pub max_retries: u32,
    pub retry_delay: f64,
    registry: Arc<NodeRegistry>,
}

impl AgentTool {
    /// Builds a tool from a descriptor already present in `registry`.
    pub fn from_descriptor(descriptor: NodeDescriptor, registry: Arc<NodeRegistry>) -> Self {
        Self {
            name: descriptor.type_tag.clone(),
            description: descriptor.description.clone(),
            is_async: descriptor.is_async,
            max_retries: descriptor.max_retries,
            retry_delay: descriptor.retry_delay,
            descriptor,
            registry,
        }
    }

    /// Invokes the bound node instance for one action input, returning its
    /// terminal `data` as the tool's observation. Streaming nodes yield
    /// their last partial as the observation.
    pub async fn invoke(&self, action_input: Value) -> Result<Value, String> {
        let instance = self.registry.instantiate(&self.descriptor.type_tag).map_err(|e| e.to_string())?;
        let ctx = NodeContext::new();
        match instance.invoke(action_input, &ctx).await? {
            NodeOutput::Terminal(value) => Ok(value),
            NodeOutput::Streaming(mut stream) => {
                let mut last = Value::Null;
                while let Some(partial) = stream.next().await {
                    last = partial;
                }
                Ok(last)
            }
        }
    }

    /// Renders this tool's name/description/params/outputs for the agent
    /// prompt's tool list (§4.7 step 1).
    pub fn describe(&self) -> String {
        let mut lines = vec![format!("- {}: {}", self.name, self.description)];
        if !self.descriptor.params.is_empty() {
            lines.push("     Parameters:".to_string());
            for (name, spec) in &self.descriptor.params {
                lines.push(format!("        {} ({}): {}", name, spec.param_type, spec.description));
            }
        }
        if !self.descriptor.outputs.is_empty() {
            lines.push("     Outputs:".to_string());
            for (name, spec) in &self.descriptor.outputs {
                lines.push(format!("        {}: {}", name, spec.description));
            }
        }
        lines.join("\n")
    }
}

/// The tools available to one agent run: name-keyed, duplicate-free.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: std::collections::HashMap<String, AgentTool>,
}

impl ToolSet {
    pub fn new(tools: Vec<AgentTool>) -> Self {
        Self {
            tools: tools.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AgentTool> {
        self.tools.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentTool> {
        self.tools.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use weft_node::NodeBody;

    struct Echo;
    #[async_trait]
    impl NodeBody for Echo {
        async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
            Ok(NodeOutput::terminal(params))
        }
    }

    fn registry() -> Arc<NodeRegistry> {
        let mut reg = NodeRegistry::new();
        reg.register(NodeDescriptor::new("echo", "Echo"), || Arc::new(Echo)).unwrap();
        Arc::new(reg)
    }

    #[tokio::test]
    async fn tool_invokes_its_bound_node() {
        let registry = registry();
        let descriptor = registry.descriptor("echo").unwrap().clone();
        let tool = AgentTool::from_descriptor(descriptor, registry);
        let result = tool.invoke(json!({"x": 1})).await.unwrap();
        assert_eq!(result, json!({"x": 1}));
    }

    #[test]
    fn tool_set_looks_up_by_name() {
        let registry = registry();
        let descriptor = registry.descriptor("echo").unwrap().clone();
        let tool = AgentTool::from_descriptor(descriptor, registry);
        let set = ToolSet::new(vec![tool]);
        assert!(set.get("echo").is_some());
        assert!(set.get("missing").is_none());
    }
}
