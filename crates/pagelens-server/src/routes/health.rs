//! Liveness endpoint.

use axum::Json;
use serde_json::{json, Value};

/// `GET /api/health`
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "message": "service up and running",
        "status": "success",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
