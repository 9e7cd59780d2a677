use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET /health - Liveness plus a store ping.
///
/// Always 200 so that load balancers keep routing while the database
/// recovers; a failed ping shows up as `"status": "degraded"`.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        })),
        Err(e) => {
            tracing::warn!("Health check: note store unavailable: {}", e);
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable"
            }))
        }
    }
}
