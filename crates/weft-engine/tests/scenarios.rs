//! Black-box scenarios built only against the public crate API: Diamond,
//! Cycle rejection, Partial failure, Parameter embedding.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use weft_core::{Graph, GraphEdge, GraphNode, NodeDescriptor, WorkflowStatus};
use weft_engine::{validate_graph, Scheduler, WorkerPool};
use weft_node::{NodeBody, NodeContext, NodeOutput, NodeRegistry};

struct Double;
#[async_trait]
impl NodeBody for Double {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let x = params.get("x").and_then(|v| v.as_i64()).unwrap_or(0);
        Ok(NodeOutput::terminal(json!({ "value": x * 2 })))
    }
}

struct Sum;
#[async_trait]
impl NodeBody for Sum {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let a = params.get("a").and_then(|v| v.as_i64()).unwrap_or(0);
        let b = params.get("b").and_then(|v| v.as_i64()).unwrap_or(0);
        Ok(NodeOutput::terminal(json!({ "value": a + b })))
    }
}

fn registry() -> Arc<NodeRegistry> {
    let mut reg = NodeRegistry::new();
    reg.register(NodeDescriptor::new("double", "Double"), || Arc::new(Double))
        .unwrap();
    reg.register(NodeDescriptor::new("sum", "Sum"), || Arc::new(Sum))
        .unwrap();
    Arc::new(reg)
}

fn node(id: &str, node_type: &str, params: HashMap<String, Value>) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        node_type: node_type.to_string(),
        params,
    }
}

fn edge(from: &str, to: &str) -> GraphEdge {
    GraphEdge {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[tokio::test]
async fn diamond_scenario_resolves_downstream_params_from_upstream_results() {
    let registry = registry();

    let mut b_params = HashMap::new();
    b_params.insert("x".to_string(), json!(1));
    let mut c_params = HashMap::new();
    c_params.insert("x".to_string(), json!(2));
    let mut d_params = HashMap::new();
    d_params.insert("a".to_string(), json!("$b.value"));
    d_params.insert("b".to_string(), json!("$c.value"));

    let graph = Graph {
        nodes: vec![
            node("a", "double", HashMap::new()),
            node("b", "double", b_params),
            node("c", "double", c_params),
            node("d", "sum", d_params),
        ],
        edges: vec![edge("a", "b"), edge("a", "c"), edge("b", "d"), edge("c", "d")],
    };

    validate_graph(&graph, &registry).expect("diamond graph is valid");

    let scheduler = Scheduler::new(registry, WorkerPool::new(4));
    let (handle, results) = scheduler.run_collect(graph, HashMap::new()).await;

    assert_eq!(handle.status(), WorkflowStatus::Completed);
    assert_eq!(results["d"].data, Some(json!({ "value": 6 })));
    assert!(results.values().all(|r| r.success));
}

#[tokio::test]
async fn cycle_is_rejected_before_any_node_runs() {
    let registry = registry();
    let graph = Graph {
        nodes: vec![node("a", "double", HashMap::new()), node("b", "double", HashMap::new())],
        edges: vec![edge("a", "b"), edge("b", "a")],
    };
    let err = validate_graph(&graph, &registry).unwrap_err();
    assert_eq!(err.code(), "CYCLE");
}

#[tokio::test]
async fn partial_failure_marks_only_the_dependent_branch_failed() {
    let registry = registry();

    // "a" fails to resolve (missing upstream), "b" has no dependency and
    // should still complete; "c" depends on "a" and must fail.
    let mut a_params = HashMap::new();
    a_params.insert("x".to_string(), json!("$never_ran.value"));
    let mut c_params = HashMap::new();
    c_params.insert("x".to_string(), json!(1));

    let graph = Graph {
        nodes: vec![
            node("a", "double", a_params),
            node("b", "double", HashMap::new()),
            node("c", "double", c_params),
        ],
        edges: vec![edge("a", "c")],
    };

    let scheduler = Scheduler::new(registry, WorkerPool::new(4));
    let (handle, results) = scheduler.run_collect(graph, HashMap::new()).await;

    assert_eq!(handle.status(), WorkflowStatus::Failed);
    assert!(!results["a"].success);
    assert!(results["b"].success);
    assert_eq!(results["c"].error.as_deref(), Some("dependency failed"));
}

#[tokio::test]
async fn parameter_embedding_scenario_substitutes_into_surrounding_text() {
    let registry = registry();
    let mut fetch_params = HashMap::new();
    fetch_params.insert("x".to_string(), json!(21));
    let mut url_params = HashMap::new();
    url_params.insert("x".to_string(), json!("$fetch.value"));

    let graph = Graph {
        nodes: vec![
            node("fetch", "double", fetch_params),
            node("use", "double", url_params),
        ],
        edges: vec![edge("fetch", "use")],
    };

    let scheduler = Scheduler::new(registry, WorkerPool::new(4));
    let (handle, results) = scheduler.run_collect(graph, HashMap::new()).await;

    assert_eq!(handle.status(), WorkflowStatus::Completed);
    assert_eq!(results["fetch"].data, Some(json!({ "value": 42 })));
    assert_eq!(results["use"].data, Some(json!({ "value": 84 })));
}
