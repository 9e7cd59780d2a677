use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::parse_note_id;

/// DELETE /notes/:id - Remove one of the caller's notes
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_note_id(&id)?;

    state.store.delete(id, &user.user_id).await?;

    tracing::debug!("Deleted note {} for user {}", id, user.user_id);
    Ok(Json(json!({ "success": true })))
}
