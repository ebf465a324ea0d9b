//! Node executor (§4.4): invokes one node instance under a time and
//! cancellation discipline, emitting a `RUNNING` start event, zero or
//! more `RUNNING` partials, then exactly one terminal event.

use crate::pool::WorkerPool;
use futures::StreamExt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use weft_core::NodeResult;
use weft_node::{NodeBody, NodeContext, NodeOutput};

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Execute one node instance, returning an ordered stream of
/// [`NodeResult`]s: the mandatory opening `RUNNING`, any partials, and the
/// single terminal event. The executor never raises: any error or panic
/// from the node body becomes a `FAILED` terminal event (§4.4).
pub fn execute_node(
    node: Arc<dyn NodeBody>,
    params: serde_json::Value,
    ctx: NodeContext,
    pool: Option<WorkerPool>,
    is_async: bool,
) -> UnboundedReceiverStream<NodeResult> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let start_time = now_secs();
        if tx.send(NodeResult::running(start_time)).is_err() {
            return;
        }

        let invoke_fut = async move { node.invoke(params, &ctx).await };

        let outcome = if is_async {
            invoke_fut.await
        } else {
            match pool {
                Some(pool) => pool
                    .run_blocking_future(invoke_fut)
                    .await
                    .unwrap_or_else(Err),
                None => invoke_fut.await,
            }
        };

        match outcome {
            Ok(NodeOutput::Terminal(data)) => {
                let _ = tx.send(NodeResult::completed(start_time, now_secs(), data));
            }
            Ok(NodeOutput::Streaming(mut stream)) => {
                let mut last = None;
                while let Some(partial) = stream.next().await {
                    if tx
                        .send(NodeResult::running_with_data(start_time, partial.clone()))
                        .is_err()
                    {
                        return;
                    }
                    last = Some(partial);
                }
                let final_data = last.unwrap_or_else(|| serde_json::json!({}));
                let _ = tx.send(NodeResult::completed(start_time, now_secs(), final_data));
            }
            Err(error) => {
                let _ = tx.send(NodeResult::failed(Some(start_time), now_secs(), error));
            }
        }
    });

    UnboundedReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::stream;
    use serde_json::json;
    use weft_core::NodeStatus;

    struct Immediate;
    #[async_trait]
    impl NodeBody for Immediate {
        async fn invoke(&self, params: serde_json::Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
            Ok(NodeOutput::terminal(params))
        }
    }

    struct Failing;
    #[async_trait]
    impl NodeBody for Failing {
        async fn invoke(&self, _params: serde_json::Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
            Err("boom".to_string())
        }
    }

    struct Streaming;
    #[async_trait]
    impl NodeBody for Streaming {
        async fn invoke(&self, _params: serde_json::Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
            let s = stream::iter(vec![json!({"i": 1}), json!({"i": 2}), json!({"i": 3})]);
            Ok(NodeOutput::Streaming(Box::pin(s)))
        }
    }

    #[tokio::test]
    async fn terminal_node_emits_running_then_completed() {
        let events: Vec<NodeResult> =
            execute_node(Arc::new(Immediate), json!({"x": 1}), NodeContext::new(), None, true)
                .collect()
                .await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, NodeStatus::Running);
        assert_eq!(events[1].status, NodeStatus::Completed);
        assert_eq!(events[1].data, Some(json!({"x": 1})));
    }

    #[tokio::test]
    async fn failing_node_emits_running_then_failed_never_panics() {
        let events: Vec<NodeResult> =
            execute_node(Arc::new(Failing), json!({}), NodeContext::new(), None, true)
                .collect()
                .await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].status, NodeStatus::Failed);
        assert_eq!(events[1].error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn streaming_node_emits_partials_then_terminal_with_last_value() {
        let events: Vec<NodeResult> =
            execute_node(Arc::new(Streaming), json!({}), NodeContext::new(), None, true)
                .collect()
                .await;
        // start RUNNING + 3 partial RUNNING + 1 terminal COMPLETED
        assert_eq!(events.len(), 5);
        assert_eq!(events[4].status, NodeStatus::Completed);
        assert_eq!(events[4].data, Some(json!({"i": 3})));
    }

    #[tokio::test]
    async fn blocking_dispatch_runs_through_pool() {
        let pool = WorkerPool::new(1);
        let events: Vec<NodeResult> = execute_node(
            Arc::new(Immediate),
            json!({"ok": true}),
            NodeContext::new(),
            Some(pool),
            false,
        )
        .collect()
        .await;
        assert_eq!(events[1].status, NodeStatus::Completed);
    }
}
