// handlers/mod.rs - 3-tier handler layout
//
// Public (no auth) -> Protected (JWT + active tenant) -> Elevated (super admin)

pub mod elevated;
pub mod protected;
pub mod public;
