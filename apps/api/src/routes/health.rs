use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Basic endpoint to check that the API is running.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the AI Personality Assessment API!"
    }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "persona-api"
    }))
}
