//! The contract every registered node type must satisfy (§4.3).

use crate::context::NodeContext;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

/// A boxed stream of partial `data` maps, the streaming half of
/// [`NodeOutput`].
pub type PartialStream = BoxStream<'static, Value>;

/// What a node instance produces for one invocation.
///
/// A node either returns a single terminal `data` map, or yields zero or
/// more intermediate `data` maps followed implicitly by a final one when
/// the stream closes (§4.3, §4.4).
pub enum NodeOutput {
    Terminal(Value),
    Streaming(PartialStream),
}

impl NodeOutput {
    pub fn terminal(value: Value) -> Self {
        NodeOutput::Terminal(value)
    }
}

/// One registered node type's execution logic.
///
/// `invoke` must never panic across the `async_trait` boundary in a way
/// that escapes the executor; `weft-engine`'s executor catches both
/// `Err` returns and panics and converts either into a `FAILED` terminal
/// result (§4.4), so implementations are free to use `?` liberally.
#[async_trait]
pub trait NodeBody: Send + Sync {
    async fn invoke(&self, params: Value, ctx: &NodeContext) -> Result<NodeOutput, String>;
}
