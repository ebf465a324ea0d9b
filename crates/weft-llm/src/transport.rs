//! The LLM transport contract (§6 "LLM transport contract"): a
//! request/response call and a chunk-streaming call, both model-selecting
//! and oversize-guarding the same way.

use crate::error::Result;
use crate::Message;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// A boxed stream of string chunks, the streaming half of [`ChatTransport`].
pub type ChunkStream = BoxStream<'static, Result<String>>;

/// What the core treats the LLM as: a request/response function and a
/// chunk-streaming function (§1 "the LLM transport is an external
/// collaborator").
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn call(&self, messages: Vec<Message>, request_id: &str, temperature: f64) -> Result<String>;

    async fn stream(&self, messages: Vec<Message>, request_id: &str) -> Result<ChunkStream>;
}
