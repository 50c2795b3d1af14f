//! Shared application state and the liveness probe.

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::gateway::AdmissionPipeline;

/// Shared application state for the gateway routes.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: AdmissionPipeline,
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "chatgate" })),
    )
}
