// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// `auth` only needs a valid token. Everything else runs behind
// `require_active_tenant` and receives a `TenantContext`; handlers narrow
// access further by tenant kind and role.

pub mod auth;
pub mod catalog;
pub mod companies;
pub mod products;
pub mod users;
