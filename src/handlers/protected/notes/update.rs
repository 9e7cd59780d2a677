use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::NotePatch;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::{parse_note_id, JsonBody};

/// PUT /notes/:id - Apply a partial update to one of the caller's notes
///
/// Expected Input (every field optional):
/// ```json
/// { "title": "string", "content": "string", "completed": true }
/// ```
/// A note owned by another user answers 404, exactly like a missing one.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<NotePatch>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_note_id(&id)?;

    state.store.update(id, &user.user_id, patch).await?;

    tracing::debug!("Updated note {} for user {}", id, user.user_id);
    Ok(Json(json!({ "success": true })))
}
