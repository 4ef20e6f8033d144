// handlers/protected/companies.rs - GET /api/v1/companies (suppliers)

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension,
};

use crate::database::models::Tenant;
use crate::middleware::{ApiResponse, ApiResult, TenantContext};
use crate::services::TenantService;
use crate::types::{Page, PageQuery, Pagination};

/// GET /api/v1/companies - active companies a supplier can give private prices
pub async fn companies_list(
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<Tenant>> {
    ctx.require_supplier()?;
    let Query(query) = query?;

    let companies = TenantService::connect()
        .await?
        .list_active_companies(Pagination::from_query(query))
        .await?;
    Ok(ApiResponse::success(companies))
}
