//! Engine-level error type, unifying validation, resolution, and registry
//! failures behind one `thiserror` enum (§7).

use thiserror::Error;
use weft_core::{ResolutionError, ValidationError};
use weft_node::RegistryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
