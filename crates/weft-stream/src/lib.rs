//! Per-session ordered event queue backing the client-facing SSE surface
//! (§4.6). Depends on nothing workspace-internal; `weft-api` is the only
//! crate that wires this multiplexer to a scheduler or agent controller.

pub mod error;
pub mod event;
pub mod multiplexer;
pub mod session;

pub use error::StreamError;
pub use event::{EventTag, StreamEvent};
pub use multiplexer::StreamMultiplexer;
pub use session::SessionId;
