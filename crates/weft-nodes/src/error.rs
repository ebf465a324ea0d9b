//! Shared error taxonomy for builtin node bodies. `NodeBody::invoke`
//! returns `Result<_, String>`, so these variants are converted with
//! `.to_string()` at each call site rather than surfaced as a crate error
//! type the executor would need to know about.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("missing required parameter: {0}")]
    MissingParam(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}
