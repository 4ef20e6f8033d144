// handlers/public/auth/register.rs - POST /api/v1/auth/register handler

use axum::{extract::rejection::JsonRejection, Json};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::tenant_service::{RegisterTenant, Registration};
use crate::services::TenantService;

/// POST /api/v1/auth/register - create a pending tenant and its admin user
///
/// ```json
/// {
///   "tenant_name": "Acme Supplies",
///   "tenant_type": "supplier",
///   "name": "Jane Doe",
///   "email": "jane@acme.test",
///   "password": "s3cretpass"
/// }
/// ```
///
/// No token is returned: the tenant must be approved before anyone can log in.
pub async fn register_post(payload: Result<Json<RegisterTenant>, JsonRejection>) -> ApiResult<Registration> {
    let Json(input) = payload?;
    let registration = TenantService::connect().await?.register(input).await?;
    Ok(ApiResponse::created(registration))
}
