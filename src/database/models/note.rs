use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored note, as persisted and as returned from create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Case-insensitive substring match on title or content. An empty term matches everything.
    ///
    /// Folding lowers one character at a time, like PostgreSQL `ILIKE` does, so
    /// context rules such as the Greek final sigma do not apply and no
    /// multi-character expansion (`ß` to `ss`) happens.
    pub fn matches(&self, search: &str) -> bool {
        if search.is_empty() {
            return true;
        }
        let needle = fold_case(search);
        fold_case(&self.title).contains(&needle) || fold_case(&self.content).contains(&needle)
    }
}

fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// List representation: owner and creation time stay server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub completed: bool,
}

impl From<Note> for NoteSummary {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            completed: note.completed,
        }
    }
}

/// A note about to be inserted. The store assigns the id; `completed` always starts false.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewNote {
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// POST /notes body. Anything besides title and content is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// PUT /notes/:id body. Absent (or null) fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.completed.is_none()
    }

    pub fn apply(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(completed) = self.completed {
            note.completed = completed;
        }
    }
}
