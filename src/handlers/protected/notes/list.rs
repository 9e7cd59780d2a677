use axum::{
    extract::{rejection::QueryRejection, Extension, Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::NoteSummary;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring of title or content. Empty lists everything.
    #[serde(default)]
    pub search: String,
}

/// GET /notes?search=<term> - The caller's notes, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<NoteSummary>>, ApiError> {
    let Query(query) = query?;
    let notes = state.store.list(&user.user_id, &query.search).await?;

    tracing::debug!("Listed {} note(s) for user {}", notes.len(), user.user_id);
    Ok(Json(notes.into_iter().map(NoteSummary::from).collect()))
}
