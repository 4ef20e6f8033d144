// handlers/elevated/tenants/list.rs - GET /api/v1/admin/tenants[/pending]

use axum::extract::{rejection::QueryRejection, Query};
use serde::Deserialize;

use crate::database::models::Tenant;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::tenant_service::TenantFilter;
use crate::services::TenantService;
use crate::types::{Page, PageQuery, Pagination, TenantStatus, TenantType};

#[derive(Debug, Default, Deserialize)]
pub struct TenantListQuery {
    pub status: Option<TenantStatus>,
    #[serde(rename = "type")]
    pub tenant_type: Option<TenantType>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/v1/admin/tenants?status=&type=&page=&limit=
pub async fn tenants_list(query: Result<Query<TenantListQuery>, QueryRejection>) -> ApiResult<Page<Tenant>> {
    let Query(query) = query?;
    let filter = TenantFilter {
        status: query.status,
        tenant_type: query.tenant_type,
    };
    let pagination = Pagination::from_query(PageQuery {
        page: query.page,
        limit: query.limit,
    });

    let tenants = TenantService::connect().await?.list(filter, pagination).await?;
    Ok(ApiResponse::success(tenants))
}

/// GET /api/v1/admin/tenants/pending - the approval queue
pub async fn tenants_pending(query: Result<Query<PageQuery>, QueryRejection>) -> ApiResult<Page<Tenant>> {
    let Query(query) = query?;
    let tenants = TenantService::connect()
        .await?
        .list_pending(Pagination::from_query(query))
        .await?;
    Ok(ApiResponse::success(tenants))
}
