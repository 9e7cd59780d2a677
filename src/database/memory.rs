use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewNote, Note, NotePatch};
use super::store::{DatabaseError, NoteStore};

/// Process-local note store. Nothing is persisted across restarts.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    notes: RwLock<Vec<Note>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list(&self, user_id: &str, search: &str) -> Result<Vec<Note>, DatabaseError> {
        let notes = self.notes.read().await;
        // Walk newest-inserted first so equal timestamps still come out newest first
        let mut found: Vec<Note> = notes
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && n.matches(search))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn insert(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let note = Note {
            id: Uuid::new_v4(),
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            completed: false,
            created_at: note.created_at,
        };
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn update(&self, id: Uuid, user_id: &str, patch: NotePatch) -> Result<(), DatabaseError> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .ok_or_else(DatabaseError::note_not_found)?;
        patch.apply(note);
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: &str) -> Result<(), DatabaseError> {
        let mut notes = self.notes.write().await;
        let index = notes
            .iter()
            .position(|n| n.id == id && n.user_id == user_id)
            .ok_or_else(DatabaseError::note_not_found)?;
        notes.remove(index);
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
