// handlers/mod.rs - Handlers split by security tier
//
// Public (no auth) → Protected (bearer token verified by middleware::require_auth)
pub mod public;
pub mod protected;
