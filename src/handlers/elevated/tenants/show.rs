// handlers/elevated/tenants/show.rs - GET /api/v1/admin/tenants/:id

use axum::extract::{rejection::PathRejection, Path};
use uuid::Uuid;

use crate::database::models::Tenant;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::TenantService;

pub async fn tenant_show(id: Result<Path<Uuid>, PathRejection>) -> ApiResult<Tenant> {
    let Path(id) = id?;
    let tenant = TenantService::connect().await?.get(id).await?;
    Ok(ApiResponse::success(tenant))
}
