// handlers/protected/auth/mod.rs - Session endpoints for authenticated users

pub mod me;

pub use me::me_get;
