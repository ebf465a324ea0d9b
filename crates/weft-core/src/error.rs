//! Error taxonomy shared across the workspace (§7).
//!
//! Each variant carries a stable `.code()` string matching the distilled
//! spec's error codes, so callers (and the wire layer) can match on the
//! code instead of parsing Display text.

use thiserror::Error;

/// Errors raised by the graph validator (§4.1). Rejected before any node
/// runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("unregistered node type: {0}")]
    UnknownType(String),

    #[error("edge references unknown node id: {0}")]
    DanglingEdge(String),

    #[error("graph contains a cycle: {0:?}")]
    Cycle(Vec<String>),
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::DuplicateId(_) => "DUPLICATE_ID",
            ValidationError::UnknownType(_) => "UNKNOWN_TYPE",
            ValidationError::DanglingEdge(_) => "DANGLING_EDGE",
            ValidationError::Cycle(_) => "CYCLE",
        }
    }
}

/// Errors raised by the parameter resolver (§4.2). Surface as a `FAILED`
/// node result; never abort siblings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("referenced node has no recorded result yet: {0}")]
    UnresolvedRef(String),

    #[error("referenced node's result has no data: {0}")]
    NoData(String),

    #[error("path segment does not exist: {0}")]
    MissingField(String),
}

impl ResolutionError {
    pub fn code(&self) -> &'static str {
        match self {
            ResolutionError::UnresolvedRef(_) => "UNRESOLVED_REF",
            ResolutionError::NoData(_) => "NO_DATA",
            ResolutionError::MissingField(_) => "MISSING_FIELD",
        }
    }
}

/// Top-level error type for `weft-core` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
