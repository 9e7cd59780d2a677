use axum::{
    extract::{Extension, State},
    response::Json,
};

use crate::app::AppState;
use crate::database::models::{CreateNote, NewNote, Note};
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::JsonBody;

/// POST /notes - Create a note owned by the caller
///
/// Expected Input:
/// ```json
/// { "title": "string", "content": "string" }
/// ```
/// Both fields may be omitted, as may the body itself. The owner, creation
/// time and `completed: false` are always set server-side, whatever the body says.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateNote>,
) -> Result<Json<Note>, ApiError> {

    let new_note = NewNote::new(
        user.user_id,
        payload.title.unwrap_or_default(),
        payload.content.unwrap_or_default(),
    );
    let note = state.store.insert(new_note).await?;

    tracing::debug!("Created note {} for user {}", note.id, note.user_id);
    Ok(Json(note))
}
