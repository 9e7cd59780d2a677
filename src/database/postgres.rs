use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;

use super::models::{NewNote, Note, NotePatch};
use super::store::{DatabaseError, NoteStore};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS notes (
        id UUID PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        content TEXT NOT NULL DEFAULT '',
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS notes_user_created_idx ON notes (user_id, created_at DESC)";

/// Note store backed by a PostgreSQL `notes` table.
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the notes table and its index if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        info!("Notes schema ready");
        Ok(())
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list(&self, user_id: &str, search: &str) -> Result<Vec<Note>, DatabaseError> {
        let notes = if search.is_empty() {
            sqlx::query_as::<_, Note>(
                "SELECT id, user_id, title, content, completed, created_at
                 FROM notes
                 WHERE user_id = $1
                 ORDER BY created_at DESC",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Note>(
                r#"SELECT id, user_id, title, content, completed, created_at
                 FROM notes
                 WHERE user_id = $1
                 AND (title ILIKE $2 ESCAPE '\' OR content ILIKE $2 ESCAPE '\')
                 ORDER BY created_at DESC"#,
            )
            .bind(user_id)
            .bind(like_pattern(search))
            .fetch_all(&self.pool)
            .await?
        };
        Ok(notes)
    }

    async fn insert(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (id, user_id, title, content, completed, created_at)
             VALUES ($1, $2, $3, $4, FALSE, $5)
             RETURNING id, user_id, title, content, completed, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    async fn update(&self, id: Uuid, user_id: &str, patch: NotePatch) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE notes
             SET title = COALESCE($3, title),
                 content = COALESCE($4, content),
                 completed = COALESCE($5, completed)
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.completed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::note_not_found());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::note_not_found());
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Build an ILIKE pattern matching `search` literally anywhere in the column.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
