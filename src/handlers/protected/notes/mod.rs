pub mod body;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

// Re-export handler functions for use in routing
pub use body::JsonBody;
pub use create::create;
pub use delete::delete;
pub use list::list;
pub use update::update;

use uuid::Uuid;

use crate::error::ApiError;

/// Note ids are UUIDs; anything else is a client error, checked before the store is touched.
fn parse_note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid note id"))
}
