//! Shared application state handed to every handler, grounded on the
//! teacher's `orchestrator::api::routes::AppState` (§6).

use std::sync::Arc;
use weft_agent::{AgentConfig, AgentController, CacheConfig};
use weft_engine::{Scheduler, WorkerPool};
use weft_llm::ChatTransport;
use weft_node::NodeRegistry;
use weft_stream::StreamMultiplexer;
use weft_tooling::Settings;

/// Everything a handler needs: the node registry and scheduler driving
/// workflow execution, the stream multiplexer backing SSE sessions, and
/// an agent controller built over the same registry's tools.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<NodeRegistry>,
    pub scheduler: Scheduler,
    pub mux: StreamMultiplexer,
    pub agent: Arc<AgentController>,
    pub transport: Arc<dyn ChatTransport>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        registry: Arc<NodeRegistry>,
        transport: Arc<dyn ChatTransport>,
        settings: Settings,
    ) -> Self {
        let pool = WorkerPool::new(settings.worker_pool_size);
        let scheduler = Scheduler::new(registry.clone(), pool);

        let tools = registry
            .descriptors()
            .map(|descriptor| weft_agent::AgentTool::from_descriptor(descriptor.clone(), registry.clone()))
            .collect::<Vec<_>>();
        let agent_config = AgentConfig {
            max_iterations: settings.agent_max_iterations,
            memory_size: settings.agent_memory_size,
            cache: CacheConfig { max_size: settings.agent_cache_size, ttl: settings.agent_cache_ttl },
            ..AgentConfig::default()
        };
        let agent = AgentController::new(agent_config, weft_agent::ToolSet::new(tools), transport.clone())
            .expect("registry must contain at least one node type to seed the agent's tool set");

        Self {
            registry,
            scheduler,
            mux: StreamMultiplexer::new(),
            agent: Arc::new(agent),
            transport,
            settings: Arc::new(settings),
        }
    }
}
