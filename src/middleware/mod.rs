pub mod auth;
pub mod response;
pub mod tenant;

pub use auth::{jwt_auth_middleware, require_super_admin, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use tenant::{require_active_tenant, TenantContext};
