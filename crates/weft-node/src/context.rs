//! Per-invocation context passed to a node body: context variables used by
//! loop-style nodes, and the narrow subgraph-execution capability (§9
//! "Cyclic references between loop-style nodes and the engine").

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use weft_core::{Graph, NodeResult};

/// The capability a loop node uses to run an inner subgraph, without the
/// node crate depending on the scheduler crate. `weft-engine`'s scheduler
/// implements this and hands a narrowed instance (its registry minus the
/// loop node itself) to the loop node's context, per §9: this avoids
/// re-entrancy on shared state and prevents infinite recursion if a
/// registered loop node is nested inside its own subgraph.
#[async_trait]
pub trait SubgraphExecutor: Send + Sync {
    async fn execute_subgraph(
        &self,
        graph: Graph,
        context: HashMap<String, Value>,
    ) -> Result<HashMap<String, NodeResult>, String>;
}

/// Per-invocation context handed to a node's `invoke`.
#[derive(Clone, Default)]
pub struct NodeContext {
    /// Context variables injected by loop-style nodes for per-iteration
    /// substitution (§4.2 "an optional `context`").
    pub variables: HashMap<String, Value>,
    subgraph_executor: Option<Arc<dyn SubgraphExecutor>>,
}

impl NodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(variables: HashMap<String, Value>) -> Self {
        Self {
            variables,
            subgraph_executor: None,
        }
    }

    pub fn with_subgraph_executor(mut self, executor: Arc<dyn SubgraphExecutor>) -> Self {
        self.subgraph_executor = Some(executor);
        self
    }

    pub fn subgraph_executor(&self) -> Option<&Arc<dyn SubgraphExecutor>> {
        self.subgraph_executor.as_ref()
    }
}
