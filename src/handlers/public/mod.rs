// handlers/public/mod.rs - Public handlers (no authentication required)
pub mod health;
pub mod root;

pub use health::health;
pub use root::root;
