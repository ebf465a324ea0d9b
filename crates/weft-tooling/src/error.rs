//! Shared tooling error taxonomy (§7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolingError {
    #[error("tooling error: {0}")]
    General(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ToolingError>;
