//! API error taxonomy and its HTTP response conversion (§7).

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

/// Error envelope sent to the client, matching the teacher's
/// `{error, message, code}` shape.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] weft_core::ValidationError),

    #[error(transparent)]
    Resolution(#[from] weft_core::ResolutionError),

    #[error(transparent)]
    Registry(#[from] weft_node::RegistryError),

    #[error(transparent)]
    Stream(#[from] weft_stream::StreamError),

    #[error(transparent)]
    Agent(#[from] weft_agent::error::AgentError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Resolution(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Registry(_) => StatusCode::BAD_REQUEST,
            ApiError::Stream(err) => match err {
                weft_stream::StreamError::NoSuchSession(_) => StatusCode::NOT_FOUND,
                weft_stream::StreamError::AlreadySubscribed(_) => StatusCode::CONFLICT,
                weft_stream::StreamError::DuplicateSession(_) => StatusCode::CONFLICT,
            },
            ApiError::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> String {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST".to_string(),
            ApiError::NotFound(_) => "NOT_FOUND".to_string(),
            ApiError::Validation(err) => err.code().to_string(),
            ApiError::Resolution(err) => err.code().to_string(),
            ApiError::Registry(_) => "UNKNOWN_TYPE".to_string(),
            ApiError::Stream(err) => err.code().to_string(),
            ApiError::Agent(_) => "AGENT_ERROR".to_string(),
            ApiError::Internal(_) => "INTERNAL_ERROR".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ApiErrorBody {
            error: self.code(),
            message: self.to_string(),
            code: self.code(),
        };
        tracing::error!(code = %body.code, "API error: {}", body.message);
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
