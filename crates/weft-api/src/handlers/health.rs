//! `GET /health` — liveness only, no dependency checks (§6).

use crate::models::HealthResponse;
use axum::Json;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
