use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

/// Root of the API-only mode, used when no frontend build is served.
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "lifelogger", "mode": "api-only" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

// Unmatched paths under /api never fall through to the frontend
pub async fn api_not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
