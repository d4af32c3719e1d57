// handlers/public/health.rs - GET /health and GET /health/ready

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET /health - liveness, never touches storage
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "todo-service"
    }))
}

/// GET /health/ready - 503 while the store cannot answer a ping
pub async fn ready(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::warn!("Readiness check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
