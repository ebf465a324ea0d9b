//! The node execution contract and the process-wide node type registry.
//!
//! Depends only on `weft-core`; the DAG scheduler (`weft-engine`) depends
//! on this crate, not the other way round, keeping the dependency order
//! in the system overview acyclic.

pub mod body;
pub mod context;
pub mod registry;

pub use body::{NodeBody, NodeOutput, PartialStream};
pub use context::{NodeContext, SubgraphExecutor};
pub use registry::{NodeRegistry, RegistryError};
