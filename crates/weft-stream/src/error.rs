//! Stream multiplexer error taxonomy (§4.6, §7).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("session already exists: {0}")]
    DuplicateSession(String),

    #[error("no such session: {0}")]
    NoSuchSession(String),

    #[error("session already has a live subscriber: {0}")]
    AlreadySubscribed(String),
}

impl StreamError {
    pub fn code(&self) -> &'static str {
        match self {
            StreamError::DuplicateSession(_) => "DUPLICATE_SESSION",
            StreamError::NoSuchSession(_) => "NO_SUCH_SESSION",
            StreamError::AlreadySubscribed(_) => "ALREADY_SUBSCRIBED",
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
