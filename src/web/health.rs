use axum::Json;
use serde_json::{Value, json};

/// `GET /health`
pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
