//! Builtin node plug-ins (§3 "Node type"): arithmetic nodes used by the
//! diamond-dependency scenario, plus `file_write`, `http_fetch`, and
//! `serper_search` drawn from the original's node catalog.

pub mod arithmetic;
pub mod error;
pub mod file_write;
pub mod http_fetch;
pub mod serper_search;

use std::sync::Arc;
use weft_node::{NodeRegistry, RegistryError};

/// Registers every builtin node type that needs no external
/// configuration: the arithmetic trio, `file_write`, `http_fetch`.
/// `serper_search` is registered separately via
/// [`register_serper_search`] since it depends on `SERPER_API_KEY`.
pub fn register_builtin_nodes(registry: &mut NodeRegistry) -> Result<(), RegistryError> {
    registry.register(arithmetic::double_descriptor(), || Arc::new(arithmetic::DoubleNode))?;
    registry.register(arithmetic::triple_descriptor(), || Arc::new(arithmetic::TripleNode))?;
    registry.register(arithmetic::sum_descriptor(), || Arc::new(arithmetic::SumNode))?;
    registry.register(file_write::descriptor(), || Arc::new(file_write::FileWriteNode))?;
    registry.register(http_fetch::descriptor(), || Arc::new(http_fetch::HttpFetchNode::default()))?;
    Ok(())
}

/// Registers `serper_search` if `SERPER_API_KEY` is set in the
/// environment; a no-op otherwise (§6 "Configuration surface").
pub fn register_serper_search(registry: &mut NodeRegistry) -> Result<(), RegistryError> {
    let Some(api_key) = weft_tooling::env::get_env("SERPER_API_KEY").ok().flatten() else {
        return Ok(());
    };
    registry.register(serper_search::descriptor(), move || Arc::new(serper_search::SerperSearchNode::new(api_key.clone())))
}
