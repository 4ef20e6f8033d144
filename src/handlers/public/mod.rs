// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service info, health and token acquisition.

pub mod auth;
pub mod system;

pub use system::{health, root};
