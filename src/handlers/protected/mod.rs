// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind middleware::require_auth, so handlers can rely
// on an AuthUser extension and must scope every store call by its user_id.
pub mod notes;
