// handlers/protected/users.rs - GET|POST /api/v1/users (tenant admins)

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Extension, Json,
};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, TenantContext};
use crate::services::user_service::NewUser;
use crate::services::UserService;
use crate::types::{Page, PageQuery, Pagination};

/// GET /api/v1/users - users of the caller's tenant
pub async fn users_list(
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<User>> {
    ctx.require_tenant_admin()?;
    let Query(query) = query?;

    let users = UserService::connect()
        .await?
        .list_users(ctx.tenant.id, Pagination::from_query(query))
        .await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/v1/users - add a user to the caller's tenant
pub async fn user_create(
    Extension(ctx): Extension<TenantContext>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<User> {
    ctx.require_tenant_admin()?;
    let Json(input) = payload?;

    let user = UserService::connect().await?.create_user(&ctx.tenant, input).await?;
    tracing::info!(actor = %ctx.user.user_id, user_id = %user.id, "Tenant admin added user");
    Ok(ApiResponse::created(user))
}
