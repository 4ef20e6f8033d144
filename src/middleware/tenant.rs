use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::{authenticated, AuthUser};
use crate::database::models::Tenant;
use crate::error::ApiError;
use crate::services::TenantService;
use crate::types::{Role, TenantType};

/// Tenant of the caller, validated against the database, injected by
/// `require_active_tenant`
#[derive(Clone, Debug)]
pub struct TenantContext {
    pub user: AuthUser,
    pub tenant: Tenant,
}

impl TenantContext {
    /// 403 unless the caller's tenant is a supplier
    pub fn require_supplier(&self) -> Result<(), ApiError> {
        self.require_tenant_type(TenantType::Supplier)
    }

    /// 403 unless the caller's tenant is a company
    pub fn require_company(&self) -> Result<(), ApiError> {
        self.require_tenant_type(TenantType::Company)
    }

    /// Supplier admins only
    pub fn require_supplier_admin(&self) -> Result<(), ApiError> {
        self.require_supplier()?;
        self.user.require_role(&[Role::SupplierAdmin])
    }

    /// The admin role of whichever kind of tenant the caller belongs to
    pub fn require_tenant_admin(&self) -> Result<(), ApiError> {
        self.user.require_role(&[Role::admin_for(self.tenant.tenant_type)])
    }

    fn require_tenant_type(&self, expected: TenantType) -> Result<(), ApiError> {
        if self.tenant.tenant_type == expected {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "Only {} tenants may perform this action",
                expected
            )))
        }
    }
}

/// Middleware that checks the caller still belongs to an active tenant.
/// Pending and rejected tenants get 403 even with a token in hand.
pub async fn require_active_tenant(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = authenticated(&request)?;

    let tenant_id = auth_user
        .tenant_id
        .ok_or_else(|| ApiError::forbidden("This endpoint requires a tenant account"))?;

    let tenant = TenantService::connect()
        .await?
        .active_membership(auth_user.user_id, tenant_id)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = %auth_user.user_id, tenant_id = %tenant_id, "Tenant validation failed: {}", e);
            ApiError::from(e)
        })?;

    tracing::debug!(tenant_id = %tenant.id, tenant = %tenant.name, "Tenant validation successful");

    request.extensions_mut().insert(TenantContext {
        user: auth_user,
        tenant,
    });

    Ok(next.run(request).await)
}
