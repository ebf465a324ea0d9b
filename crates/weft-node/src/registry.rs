//! Process-wide `type -> constructor` map (§4.3).

use crate::body::NodeBody;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use weft_core::NodeDescriptor;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node type already registered: {0}")]
    DuplicateType(String),

    #[error("unregistered node type: {0}")]
    UnknownType(String),
}

type Constructor = Arc<dyn Fn() -> Arc<dyn NodeBody> + Send + Sync>;

/// Maps a `type` tag to both its static [`NodeDescriptor`] and a
/// constructor for fresh node instances (§3 "Node instance": created per
/// execution, owns no state beyond the call, destroyed when it returns).
///
/// Registration is additive: a tag cannot be replaced once registered.
/// Read-only after startup (§5 "Shared-resource policy"); no implicit
/// global instance is provided (§9 "Global state") — callers construct
/// their own and pass it down explicitly.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    descriptors: HashMap<String, NodeDescriptor>,
    constructors: HashMap<String, Constructor>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        descriptor: NodeDescriptor,
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Arc<dyn NodeBody> + Send + Sync + 'static,
    {
        let tag = descriptor.type_tag.clone();
        if self.descriptors.contains_key(&tag) {
            return Err(RegistryError::DuplicateType(tag));
        }
        self.descriptors.insert(tag.clone(), descriptor);
        self.constructors.insert(tag, Arc::new(constructor));
        Ok(())
    }

    pub fn descriptor(&self, type_tag: &str) -> Option<&NodeDescriptor> {
        self.descriptors.get(type_tag)
    }

    pub fn is_registered(&self, type_tag: &str) -> bool {
        self.descriptors.contains_key(type_tag)
    }

    pub fn instantiate(&self, type_tag: &str) -> Result<Arc<dyn NodeBody>, RegistryError> {
        self.constructors
            .get(type_tag)
            .map(|ctor| ctor())
            .ok_or_else(|| RegistryError::UnknownType(type_tag.to_string()))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.descriptors.values()
    }

    /// A copy of this registry with one type tag removed, used by loop
    /// nodes' subgraph capability to prevent self-nesting (§9).
    pub fn without(&self, type_tag: &str) -> Self {
        let mut copy = self.clone();
        copy.descriptors.remove(type_tag);
        copy.constructors.remove(type_tag);
        copy
    }
}
