//! Dependency-driven DAG scheduler (§4.5): launches start-set nodes
//! concurrently, recursively launches downstream nodes as their
//! predecessors complete, and exposes cooperative pause/cancel.

use crate::executor::execute_node;
use crate::params::resolve_params;
use crate::pool::WorkerPool;
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex as SyncMutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use weft_core::{Graph, NodeResult, Progress, WorkflowStatus};
use weft_node::{NodeContext, NodeRegistry, SubgraphExecutor};

/// Invoked after every node event is recorded into `progress` and before
/// it is forwarded to any stream consumer (§4.5 step 3, supplementary
/// callback chain grounded on the original's node-completion hook).
pub type NodeResultCallback = Arc<dyn Fn(&str, &NodeResult) + Send + Sync>;

struct SchedulerState {
    status: SyncMutex<WorkflowStatus>,
    cancelled: AtomicBool,
    inflight: AtomicUsize,
    /// Node ids already handed to `launch` for this run. A join node can
    /// become downstream-ready once per completing predecessor, so this
    /// claim guards against launching it — and invoking its body — more
    /// than once (P1, P5).
    launched: SyncMutex<HashSet<String>>,
}

/// A live handle to a running workflow: lets a caller pause, resume, or
/// cancel cooperatively, and inspect the current [`WorkflowStatus`].
#[derive(Clone)]
pub struct SchedulerHandle {
    state: Arc<SchedulerState>,
}

impl SchedulerHandle {
    fn new() -> Self {
        Self {
            state: Arc::new(SchedulerState {
                status: SyncMutex::new(WorkflowStatus::Running),
                cancelled: AtomicBool::new(false),
                inflight: AtomicUsize::new(0),
                launched: SyncMutex::new(HashSet::new()),
            }),
        }
    }

    /// Claims `id` for launch exactly once: returns `true` the first time
    /// it is called for a given id, `false` on every subsequent call.
    fn claim_launch(&self, id: &str) -> bool {
        self.state.launched.lock().insert(id.to_string())
    }

    pub fn status(&self) -> WorkflowStatus {
        *self.state.status.lock()
    }

    fn set_status(&self, status: WorkflowStatus) {
        *self.state.status.lock() = status;
    }

    /// Suppresses new task launches; in-flight nodes finish naturally.
    pub fn pause(&self) {
        let mut guard = self.state.status.lock();
        if *guard == WorkflowStatus::Running {
            *guard = WorkflowStatus::Paused;
        }
    }

    pub fn resume(&self) {
        let mut guard = self.state.status.lock();
        if *guard == WorkflowStatus::Paused {
            *guard = WorkflowStatus::Running;
        }
    }

    /// Cooperative: downstream launches stop at their next check.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    async fn wait_while_paused(&self) {
        while self.status() == WorkflowStatus::Paused {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn task_started(&self) {
        self.state.inflight.fetch_add(1, Ordering::SeqCst);
    }

    fn task_finished(&self) {
        self.state.inflight.fetch_sub(1, Ordering::SeqCst);
    }

    async fn wait_until_drained(&self) {
        while self.state.inflight.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// Runs one workflow graph to completion, dispatching node executions
/// through a shared [`NodeRegistry`] and [`WorkerPool`] (§4.4, §4.5).
#[derive(Clone)]
pub struct Scheduler {
    registry: Arc<NodeRegistry>,
    pool: WorkerPool,
    callbacks: Arc<SyncMutex<Vec<NodeResultCallback>>>,
}

impl Scheduler {
    pub fn new(registry: Arc<NodeRegistry>, pool: WorkerPool) -> Self {
        Self {
            registry,
            pool,
            callbacks: Arc::new(SyncMutex::new(Vec::new())),
        }
    }

    /// Registers a callback invoked for every recorded node event, in
    /// registration order.
    pub fn on_node_result(&self, callback: NodeResultCallback) {
        self.callbacks.lock().push(callback);
    }

    /// Runs the workflow and returns only the final progress map, once
    /// every launched task has returned (§4.5 step 4).
    pub async fn run_collect(
        &self,
        graph: Graph,
        context: HashMap<String, Value>,
    ) -> (SchedulerHandle, HashMap<String, NodeResult>) {
        let (handle, mut rx) = self.run_stream(graph, context);
        let mut collected = HashMap::new();
        while let Some((id, result)) = rx.next().await {
            collected.insert(id, result);
        }
        (handle, collected)
    }

    /// Runs the workflow and returns the live handle plus a channel of
    /// `(node_id, result)` events in publication order (§4.5's *stream*
    /// entry point).
    pub fn run_stream(
        &self,
        graph: Graph,
        context: HashMap<String, Value>,
    ) -> (SchedulerHandle, tokio_stream::wrappers::UnboundedReceiverStream<(String, NodeResult)>) {
        let handle = SchedulerHandle::new();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let progress = Progress::new();

        let scheduler = self.clone();
        let driver_handle = handle.clone();
        let graph = Arc::new(graph);
        let context = Arc::new(context);

        tokio::spawn(async move {
            let deps = Arc::new(graph.predecessors());
            let start = graph.start_set();

            for id in start {
                scheduler.launch(
                    id,
                    graph.clone(),
                    deps.clone(),
                    progress.clone(),
                    context.clone(),
                    driver_handle.clone(),
                    tx.clone(),
                );
            }
            drop(tx);

            driver_handle.wait_until_drained().await;

            let final_status = if driver_handle.is_cancelled() {
                WorkflowStatus::Cancelled
            } else {
                let all_ids: Vec<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
                if progress.all_succeeded(&all_ids) {
                    WorkflowStatus::Completed
                } else {
                    WorkflowStatus::Failed
                }
            };
            driver_handle.set_status(final_status);
        });

        (handle, tokio_stream::wrappers::UnboundedReceiverStream::new(rx))
    }

    /// Spawns one node's processing task (§4.5 step 3). Recursion into
    /// downstream nodes happens from inside the spawned task itself, each
    /// recursive launch independently tracked via the handle's in-flight
    /// counter so the driver only finalizes once every launched task —
    /// direct or downstream — has returned.
    ///
    /// A join node can be reported downstream-ready once per completing
    /// predecessor (e.g. both `b` and `c` satisfying `d` in a diamond), so
    /// launches are de-duplicated by claiming `id` on the handle before
    /// spawning: only the caller that wins the claim actually launches.
    fn launch(
        &self,
        id: String,
        graph: Arc<Graph>,
        deps: Arc<HashMap<String, Vec<String>>>,
        progress: Progress,
        context: Arc<HashMap<String, Value>>,
        handle: SchedulerHandle,
        tx: UnboundedSender<(String, NodeResult)>,
    ) {
        if !handle.claim_launch(&id) {
            return;
        }
        let scheduler = self.clone();
        handle.task_started();
        tokio::spawn(async move {
            scheduler
                .process_node(&id, &graph, &deps, &progress, &context, &handle, &tx)
                .await;
            handle.task_finished();
        });
    }

    #[allow(clippy::too_many_arguments)]
    async fn process_node(
        &self,
        id: &str,
        graph: &Arc<Graph>,
        deps: &Arc<HashMap<String, Vec<String>>>,
        progress: &Progress,
        context: &Arc<HashMap<String, Value>>,
        handle: &SchedulerHandle,
        tx: &UnboundedSender<(String, NodeResult)>,
    ) {
        if handle.is_cancelled() {
            return;
        }
        handle.wait_while_paused().await;
        if handle.is_cancelled() {
            return;
        }

        let predecessors = deps.get(id).cloned().unwrap_or_default();
        if !predecessors.is_empty() && !progress.all_succeeded(&predecessors) {
            self.record(id, NodeResult::dependency_failed(), progress, tx);
            return;
        }

        let node = match graph.node(id) {
            Some(n) => n,
            None => return,
        };

        let resolved = match resolve_params(&node.params, progress, context) {
            Ok(p) => p,
            Err(e) => {
                self.record(id, NodeResult::failed(None, now(), e.to_string()), progress, tx);
                return;
            }
        };

        let descriptor = self.registry.descriptor(&node.node_type).cloned();
        let is_async = descriptor.as_ref().map(|d| d.is_async).unwrap_or(true);

        let instance = match self.registry.instantiate(&node.node_type) {
            Ok(i) => i,
            Err(e) => {
                self.record(id, NodeResult::failed(None, now(), e.to_string()), progress, tx);
                return;
            }
        };

        let subgraph_executor: Arc<dyn SubgraphExecutor> =
            Arc::new(self.narrowed_for(&node.node_type));
        let ctx = NodeContext::with_variables((**context).clone())
            .with_subgraph_executor(subgraph_executor);

        let params_value = serde_json::to_value(&resolved).unwrap_or(Value::Null);
        let mut events = execute_node(instance, params_value, ctx, Some(self.pool.clone()), is_async);

        let mut terminal_completed = false;
        while let Some(event) = events.next().await {
            let is_completed = matches!(event.status, weft_core::NodeStatus::Completed);
            self.record(id, event, progress, tx);
            if is_completed {
                terminal_completed = true;
            }
        }

        if terminal_completed {
            let downstream = downstream_ready(graph, deps, id, progress);
            for next in downstream {
                self.launch(
                    next,
                    graph.clone(),
                    deps.clone(),
                    progress.clone(),
                    context.clone(),
                    handle.clone(),
                    tx.clone(),
                );
            }
        }
    }

    fn record(&self, id: &str, result: NodeResult, progress: &Progress, tx: &UnboundedSender<(String, NodeResult)>) {
        progress.set(id, result.clone());
        for callback in self.callbacks.lock().iter() {
            callback(id, &result);
        }
        let _ = tx.send((id.to_string(), result));
    }

    /// A scheduler sharing this one's pool and callbacks but whose
    /// registry excludes `exclude_type`, handed to a node's context as
    /// its subgraph-execution capability (§9).
    fn narrowed_for(&self, exclude_type: &str) -> Scheduler {
        Scheduler {
            registry: Arc::new(self.registry.without(exclude_type)),
            pool: self.pool.clone(),
            callbacks: self.callbacks.clone(),
        }
    }
}

#[async_trait]
impl SubgraphExecutor for Scheduler {
    async fn execute_subgraph(
        &self,
        graph: Graph,
        context: HashMap<String, Value>,
    ) -> Result<HashMap<String, NodeResult>, String> {
        let (handle, results) = self.run_collect(graph, context).await;
        if handle.status() == WorkflowStatus::Failed {
            return Err("subgraph execution failed".to_string());
        }
        Ok(results)
    }
}

fn downstream_ready(
    graph: &Graph,
    deps: &HashMap<String, Vec<String>>,
    completed: &str,
    progress: &Progress,
) -> Vec<String> {
    graph
        .nodes
        .iter()
        .filter(|n| {
            deps.get(&n.id)
                .map(|preds| preds.iter().any(|p| p == completed) && progress.all_succeeded(preds))
                .unwrap_or(false)
        })
        .map(|n| n.id.clone())
        .collect()
}

fn now() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
