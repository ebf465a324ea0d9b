//! Graph validator (§4.1): duplicate ids, unregistered types, dangling
//! edges, cycles — checked in that order, each with a classified error.

use std::collections::{HashMap, HashSet};
use weft_core::{Graph, ValidationError};
use weft_node::NodeRegistry;

/// Validate a graph against a node registry. Checks run in the order the
/// spec lists them so the first violation encountered is the one
/// reported, matching `validate_workflow`'s sequential checks in the
/// original implementation.
pub fn validate_graph(graph: &Graph, registry: &NodeRegistry) -> Result<(), ValidationError> {
    check_duplicate_ids(graph)?;
    check_unknown_types(graph, registry)?;
    check_dangling_edges(graph)?;
    check_acyclic(graph)?;
    Ok(())
}

fn check_duplicate_ids(graph: &Graph) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId(node.id.clone()));
        }
    }
    Ok(())
}

fn check_unknown_types(graph: &Graph, registry: &NodeRegistry) -> Result<(), ValidationError> {
    for node in &graph.nodes {
        if !registry.is_registered(&node.node_type) {
            return Err(ValidationError::UnknownType(node.node_type.clone()));
        }
    }
    Ok(())
}

fn check_dangling_edges(graph: &Graph) -> Result<(), ValidationError> {
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &graph.edges {
        if !ids.contains(edge.from.as_str()) {
            return Err(ValidationError::DanglingEdge(edge.from.clone()));
        }
        if !ids.contains(edge.to.as_str()) {
            return Err(ValidationError::DanglingEdge(edge.to.clone()));
        }
    }
    Ok(())
}

/// DFS back-edge detection, returning the cycle as a witness path in
/// traversal order (grounded on the observed behavior of
/// `networkx.find_cycle`, which reports the edge sequence of the first
/// cycle a DFS encounters).
fn check_acyclic(graph: &Graph) -> Result<(), ValidationError> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in &graph.nodes {
        adjacency.entry(node.id.as_str()).or_default();
    }
    for edge in &graph.edges {
        adjacency.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks: HashMap<&str, Mark> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), Mark::Unvisited))
        .collect();
    let mut path: Vec<&str> = Vec::new();

    fn visit<'a>(
        node: &'a str,
        adjacency: &HashMap<&'a str, Vec<&'a str>>,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        marks.insert(node, Mark::InProgress);
        path.push(node);

        if let Some(neighbors) = adjacency.get(node) {
            for &next in neighbors {
                match marks.get(next).copied().unwrap_or(Mark::Unvisited) {
                    Mark::Unvisited => {
                        if let Some(cycle) = visit(next, adjacency, marks, path) {
                            return Some(cycle);
                        }
                    }
                    Mark::InProgress => {
                        let start = path.iter().position(|&n| n == next).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|s| s.to_string()).collect();
                        cycle.push(next.to_string());
                        return Some(cycle);
                    }
                    Mark::Done => {}
                }
            }
        }

        path.pop();
        marks.insert(node, Mark::Done);
        None
    }

    for node in &graph.nodes {
        if marks[node.id.as_str()] == Mark::Unvisited {
            if let Some(cycle) = visit(node.id.as_str(), &adjacency, &mut marks, &mut path) {
                return Err(ValidationError::Cycle(cycle));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap as Map;
    use std::sync::Arc;
    use weft_core::{GraphEdge, GraphNode};
    use weft_node::{NodeBody, NodeContext, NodeDescriptor, NodeOutput};

    struct Noop;
    #[async_trait]
    impl NodeBody for Noop {
        async fn invoke(&self, _p: Value, _c: &NodeContext) -> Result<NodeOutput, String> {
            Ok(NodeOutput::terminal(json!({})))
        }
    }

    fn registry() -> NodeRegistry {
        let mut reg = NodeRegistry::new();
        reg.register(NodeDescriptor::new("noop", "Noop"), || Arc::new(Noop))
            .unwrap();
        reg
    }

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            node_type: "noop".to_string(),
            params: Map::new(),
        }
    }

    fn edge(from: &str, to: &str) -> GraphEdge {
        GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn duplicate_ids_rejected() {
        let g = Graph {
            nodes: vec![node("a"), node("a")],
            edges: vec![],
        };
        let err = validate_graph(&g, &registry()).unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_ID");
    }

    #[test]
    fn unknown_type_rejected() {
        let mut n = node("a");
        n.node_type = "not_registered".to_string();
        let g = Graph {
            nodes: vec![n],
            edges: vec![],
        };
        let err = validate_graph(&g, &registry()).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_TYPE");
    }

    #[test]
    fn dangling_edge_rejected() {
        let g = Graph {
            nodes: vec![node("a")],
            edges: vec![edge("a", "ghost")],
        };
        let err = validate_graph(&g, &registry()).unwrap_err();
        assert_eq!(err.code(), "DANGLING_EDGE");
    }

    #[test]
    fn cycle_rejected_with_witness() {
        let g = Graph {
            nodes: vec![node("a"), node("b")],
            edges: vec![edge("a", "b"), edge("b", "a")],
        };
        let err = validate_graph(&g, &registry()).unwrap_err();
        assert_eq!(err.code(), "CYCLE");
        if let ValidationError::Cycle(witness) = err {
            assert!(witness.contains(&"a".to_string()));
            assert!(witness.contains(&"b".to_string()));
        } else {
            unreachable!();
        }
    }

    #[test]
    fn diamond_graph_passes() {
        let g = Graph {
            nodes: vec![node("a"), node("b"), node("c"), node("d")],
            edges: vec![edge("a", "b"), edge("a", "c"), edge("b", "d"), edge("c", "d")],
        };
        assert!(validate_graph(&g, &registry()).is_ok());
    }

    #[test]
    fn isolated_node_passes() {
        let g = Graph {
            nodes: vec![node("lonely")],
            edges: vec![],
        };
        assert!(validate_graph(&g, &registry()).is_ok());
    }
}
