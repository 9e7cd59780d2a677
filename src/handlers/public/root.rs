use axum::response::Json;
use serde_json::{json, Value};

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Notes API",
        "version": version,
        "description": "Per-user notes with bearer-token authentication",
        "endpoints": {
            "health": "GET /health (public)",
            "list": "GET /notes?search=<term> (protected)",
            "create": "POST /notes (protected)",
            "update": "PUT /notes/:id (protected)",
            "delete": "DELETE /notes/:id (protected)",
        }
    }))
}
