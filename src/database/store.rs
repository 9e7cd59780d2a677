use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewNote, Note, NotePatch};

/// Errors from note stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Unsupported database scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    pub(crate) fn note_not_found() -> Self {
        DatabaseError::NotFound("Note not found".to_string())
    }
}

/// Persistence for notes. Every operation except `insert` is scoped by the
/// owning user's id; a note owned by someone else behaves as if absent.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Notes owned by `user_id` matching `search`, newest first.
    async fn list(&self, user_id: &str, search: &str) -> Result<Vec<Note>, DatabaseError>;

    async fn insert(&self, note: NewNote) -> Result<Note, DatabaseError>;

    /// Apply `patch` to the note `id` owned by `user_id`, or `NotFound`.
    async fn update(&self, id: Uuid, user_id: &str, patch: NotePatch) -> Result<(), DatabaseError>;

    /// Remove the note `id` owned by `user_id`, or `NotFound`.
    async fn delete(&self, id: Uuid, user_id: &str) -> Result<(), DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Release connections. Called once after the server stops.
    async fn close(&self) {}
}
