// handlers/elevated/tenants/mod.rs - Tenant approval workflow

pub mod list;
pub mod review;
pub mod show;

pub use list::{tenants_list, tenants_pending};
pub use review::{tenant_approve, tenant_reject};
pub use show::tenant_show;
