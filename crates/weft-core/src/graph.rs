//! Graph shape: `{ nodes, edges }` as declared by a workflow author.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One node declaration inside a [`Graph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub params: HashMap<String, Value>,
}

/// One directed edge inside a [`Graph`], `from` must complete before `to`
/// is eligible to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// A workflow graph as submitted by a client. Immutable once validated
/// (§3 "Graph"); validation itself lives in `weft-engine` since it needs
/// the node registry to check `UNKNOWN_TYPE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Reverse dependency map: node id -> set of predecessor ids (§4.5
    /// step 1).
    pub fn predecessors(&self) -> HashMap<String, Vec<String>> {
        let mut deps: HashMap<String, Vec<String>> =
            self.nodes.iter().map(|n| (n.id.clone(), Vec::new())).collect();
        for edge in &self.edges {
            deps.entry(edge.to.clone()).or_default().push(edge.from.clone());
        }
        deps
    }

    /// Nodes with no incident edges at all, or with no predecessors - the
    /// scheduler's start set (§4.5 step 2).
    pub fn start_set(&self) -> Vec<String> {
        let deps = self.predecessors();
        let has_outgoing: std::collections::HashSet<&str> =
            self.edges.iter().map(|e| e.from.as_str()).collect();
        self.nodes
            .iter()
            .filter(|n| {
                let no_predecessors = deps.get(&n.id).map(|d| d.is_empty()).unwrap_or(true);
                let isolated = no_predecessors && !has_outgoing.contains(n.id.as_str());
                no_predecessors || isolated
            })
            .map(|n| n.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            node_type: "noop".to_string(),
            params: HashMap::new(),
        }
    }

    fn edge(from: &str, to: &str) -> GraphEdge {
        GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn start_set_includes_roots_and_isolated() {
        let g = Graph {
            nodes: vec![node("a"), node("b"), node("c"), node("isolated")],
            edges: vec![edge("a", "b"), edge("b", "c")],
        };
        let mut start = g.start_set();
        start.sort();
        assert_eq!(start, vec!["a".to_string(), "isolated".to_string()]);
    }

    #[test]
    fn predecessors_reverses_edges() {
        let g = Graph {
            nodes: vec![node("a"), node("b"), node("c")],
            edges: vec![edge("a", "c"), edge("b", "c")],
        };
        let deps = g.predecessors();
        let mut c_deps = deps["c"].clone();
        c_deps.sort();
        assert_eq!(c_deps, vec!["a".to_string(), "b".to_string()]);
        assert!(deps["a"].is_empty());
    }
}
