pub mod note;

pub use note::{CreateNote, NewNote, Note, NotePatch, NoteSummary};
