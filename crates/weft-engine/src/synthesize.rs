//! Workflow synthesis: turns a natural-language request into a [`Graph`]
//! by prompting the LLM transport with the registry's node catalog
//! (system overview diagram, "workflow synthesizer (LLM → graph JSON)").
//!
//! Grounded on the original's `WorkflowService.generate_workflow`: a
//! system prompt enumerating registered node types and an example JSON
//! shape, a user prompt carrying the request text, one transport call,
//! and a fenced-code-block strip before decoding. A request that needs no
//! workflow (or whose response fails to decode) yields an empty graph;
//! the caller falls back to a plain answer in that case, matching the
//! original's `if not workflow.get("nodes")` branch.

use weft_core::Graph;
use weft_llm::{ChatTransport, Message};
use weft_node::NodeRegistry;

const REFERENCE_FORMAT: &str = "$node_id.field";

/// Builds the system prompt enumerating every registered node type: its
/// tag, description, declared params, and declared outputs.
fn describe_nodes(registry: &NodeRegistry) -> String {
    let mut descriptors: Vec<_> = registry.descriptors().collect();
    descriptors.sort_by(|a, b| a.type_tag.cmp(&b.type_tag));

    descriptors
        .iter()
        .map(|d| {
            let params = d
                .params
                .iter()
                .map(|(name, spec)| format!("{name} ({}{}): {}", spec.param_type, if spec.required { ", required" } else { "" }, spec.description))
                .collect::<Vec<_>>()
                .join("; ");
            let outputs = d.outputs.iter().map(|(name, spec)| format!("{name}: {}", spec.description)).collect::<Vec<_>>().join("; ");
            format!("- {} ({}): {}\n  params: {}\n  outputs: {}", d.type_tag, d.name, d.description, params, outputs)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn example_json() -> &'static str {
    r#"{
  "nodes": [
    { "id": "descriptive_node_id", "type": "<registered type>", "params": { "key": "value" } }
  ],
  "edges": [
    { "from": "descriptive_node_id", "to": "other_node_id" }
  ]
}"#
}

fn system_prompt(registry: &NodeRegistry) -> String {
    format!(
        "You are a workflow design expert. Translate the user's request into a structured \
         workflow of the registered node types below.\n\n\
         Requirements:\n\
         1. Node ids must be unique and descriptive (e.g. extract_keywords, analyze_sentiment).\n\
         2. Use the edges array to declare dependencies between nodes.\n\
         3. Reference an upstream node's output with the \"{REFERENCE_FORMAT}\" form.\n\
         4. Every param value's type must match what the node declares.\n\
         5. The graph must be a directed acyclic graph.\n\n\
         Registered node types:\n{}",
        describe_nodes(registry)
    )
}

fn user_prompt(text: &str) -> String {
    format!(
        "Design a workflow for the following request. If the request does not need a workflow, \
         respond with empty \"nodes\" and \"edges\" arrays.\n\n\
         Respond with exactly this JSON shape:\n{}\n\nRequest: {text}",
        example_json()
    )
}

/// Calls the transport once and decodes its response into a [`Graph`].
/// A response that fails to decode — or that has no `nodes` — yields an
/// empty graph rather than an error, matching the original's blanket
/// `except: return {"nodes": [], "edges": []}`.
pub async fn synthesize_workflow(
    text: &str,
    registry: &NodeRegistry,
    transport: &dyn ChatTransport,
    request_id: &str,
) -> Graph {
    let messages = vec![Message::system(system_prompt(registry)), Message::user(user_prompt(text))];

    let response = match transport.call(messages, request_id, 0.2).await {
        Ok(response) => response,
        Err(_) => return empty_graph(),
    };

    decode_graph(&response)
}

fn decode_graph(response: &str) -> Graph {
    let body = extract_fenced_block(response).unwrap_or(response);
    serde_json::from_str(body.trim()).unwrap_or_else(|_| empty_graph())
}

fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_open = &text[start + 3..];
    let after_open = after_open.strip_prefix("json").unwrap_or(after_open);
    let end = after_open.find("```")?;
    Some(&after_open[..end])
}

fn empty_graph() -> Graph {
    Graph { nodes: Vec::new(), edges: Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use weft_core::NodeDescriptor;
    use weft_llm::{ChunkStream, Result as LlmResult};

    struct StubTransport(String);

    #[async_trait]
    impl ChatTransport for StubTransport {
        async fn call(&self, _messages: Vec<Message>, _request_id: &str, _temperature: f64) -> LlmResult<String> {
            Ok(self.0.clone())
        }

        async fn stream(&self, _messages: Vec<Message>, _request_id: &str) -> LlmResult<ChunkStream> {
            unimplemented!("not used in synthesis tests")
        }
    }

    fn registry() -> NodeRegistry {
        let mut reg = NodeRegistry::new();
        reg.register(NodeDescriptor::new("double", "Double").with_description("doubles a number"), || {
            use async_trait::async_trait as at;
            struct Noop;
            #[at]
            impl weft_node::NodeBody for Noop {
                async fn invoke(&self, p: serde_json::Value, _c: &weft_node::NodeContext) -> Result<weft_node::NodeOutput, String> {
                    Ok(weft_node::NodeOutput::terminal(p))
                }
            }
            std::sync::Arc::new(Noop)
        })
        .unwrap();
        reg
    }

    #[tokio::test]
    async fn decodes_fenced_graph_response() {
        let transport = StubTransport(
            "```json\n{\"nodes\":[{\"id\":\"a\",\"type\":\"double\",\"params\":{\"x\":1}}],\"edges\":[]}\n```".to_string(),
        );
        let graph = synthesize_workflow("double 1", &registry(), &transport, "req-1").await;
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].node_type, "double");
    }

    #[tokio::test]
    async fn unparseable_response_yields_empty_graph() {
        let transport = StubTransport("not json at all".to_string());
        let graph = synthesize_workflow("hello", &registry(), &transport, "req-2").await;
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[tokio::test]
    async fn bare_json_without_fence_decodes() {
        let transport = StubTransport("{\"nodes\":[],\"edges\":[]}".to_string());
        let graph = synthesize_workflow("no workflow needed", &registry(), &transport, "req-3").await;
        assert!(graph.nodes.is_empty());
    }

    #[test]
    fn describe_nodes_lists_registered_types() {
        let desc = describe_nodes(&registry());
        assert!(desc.contains("double"));
        assert!(desc.contains("doubles a number"));
    }
}
