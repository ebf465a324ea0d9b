//! Graph validation, parameter resolution, node execution, and the
//! dependency-driven DAG scheduler (§4.1, §4.2, §4.4, §4.5).

pub mod error;
pub mod executor;
pub mod explain;
pub mod params;
pub mod pool;
pub mod scheduler;
pub mod synthesize;
pub mod validate;

pub use error::EngineError;
pub use explain::explain_workflow_result;
pub use pool::WorkerPool;
pub use scheduler::{NodeResultCallback, Scheduler, SchedulerHandle};
pub use synthesize::synthesize_workflow;
pub use validate::validate_graph;
