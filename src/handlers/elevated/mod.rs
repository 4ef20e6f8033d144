// handlers/elevated/mod.rs - Super admin handlers
//
// Mounted under /api/v1/admin behind `jwt_auth_middleware` and
// `require_super_admin`.

pub mod tenants;
