//! Shared data model for the weft workflow engine.
//!
//! This crate is a leaf in the workspace's dependency order: it defines the
//! descriptors, graph shape, statuses, results, and error taxonomy that
//! every other crate builds on, and depends on nothing workspace-internal.

pub mod descriptor;
pub mod error;
pub mod graph;
pub mod progress;
pub mod result;
pub mod status;

pub use descriptor::{NodeDescriptor, OutputSpec, ParamSpec};
pub use error::{CoreError, ResolutionError, ValidationError};
pub use graph::{Graph, GraphEdge, GraphNode};
pub use progress::Progress;
pub use result::NodeResult;
pub use status::{NodeStatus, WorkflowStatus};

/// Crate version, mirroring the teacher's per-crate `version()` helper.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
