//! Liveness handlers.

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Root route - service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is running")
    )
)]
pub async fn root() -> impl IntoResponse {
    Json(json!({ "service": "pixinfo", "status": "running" }))
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    Json(json!({ "status": "alive" }))
}
