//! The LLM transport contract: model selection, the oversize truncation
//! guard, retries, and one concrete HTTP provider (§6 "LLM transport
//! contract"). The core treats this as an external collaborator — a
//! request/response function and a chunk-streaming function (§1).

pub mod config;
pub mod error;
pub mod http;
pub mod message;
pub mod transport;
pub mod truncate;

pub use config::LlmConfig;
pub use error::{LlmError, Result};
pub use http::HttpChatTransport;
pub use message::Message;
pub use transport::{ChatTransport, ChunkStream};
pub use truncate::{messages_length, select_model, truncate_oversize};
