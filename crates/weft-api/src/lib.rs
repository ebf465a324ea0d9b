//! The HTTP surface for the weft workflow/agent engine: `GET /health`,
//! `POST /chat`, `GET /stream/{id}`, `POST /execute_workflow` (§6).

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use error::{ApiError, Result};
pub use routes::create_router;
pub use state::AppState;
