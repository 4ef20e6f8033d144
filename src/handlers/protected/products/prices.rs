// handlers/protected/products/prices.rs - /api/v1/products/:id/prices/*

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Extension, Json,
};
use uuid::Uuid;

use crate::database::models::{PriceAuditEntry, PriceView};
use crate::middleware::{ApiResponse, ApiResult, TenantContext};
use crate::pricing::{TierSet, TierSetInput};
use crate::services::pricing_service::{CompanyPriceList, PriceList};
use crate::services::PricingService;
use crate::types::{Page, PageQuery, Pagination};

/// GET /api/v1/products/:id/prices/default - `null` data when unpriced
pub async fn default_prices_get(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Option<PriceList>> {
    ctx.require_supplier()?;
    let Path(product_id) = id?;

    let prices = PricingService::connect()
        .await?
        .get_default_prices(ctx.tenant.id, product_id)
        .await?;
    Ok(ApiResponse::success(prices))
}

/// PUT /api/v1/products/:id/prices/default - replace the default tiers
///
/// ```json
/// { "currency": "USD", "tiers": [{ "min_quantity": 1, "unit_price": "10.00" }] }
/// ```
pub async fn default_prices_put(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TierSetInput>, JsonRejection>,
) -> ApiResult<PriceList> {
    ctx.require_supplier_admin()?;
    let Path(product_id) = id?;
    let Json(input) = payload?;
    let tiers = TierSet::from_input(input)?;

    let prices = PricingService::connect()
        .await?
        .set_default_prices(ctx.tenant.id, product_id, tiers, ctx.user.user_id)
        .await?;
    Ok(ApiResponse::success(prices))
}

/// GET /api/v1/products/:id/prices/private - private tiers grouped by company
pub async fn private_prices_list(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Vec<CompanyPriceList>> {
    ctx.require_supplier()?;
    let Path(product_id) = id?;

    let prices = PricingService::connect()
        .await?
        .list_private_prices(ctx.tenant.id, product_id)
        .await?;
    Ok(ApiResponse::success(prices))
}

/// PUT /api/v1/products/:id/prices/private/:company_id
pub async fn private_prices_put(
    Extension(ctx): Extension<TenantContext>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<TierSetInput>, JsonRejection>,
) -> ApiResult<PriceList> {
    ctx.require_supplier_admin()?;
    let Path((product_id, company_id)) = ids?;
    let Json(input) = payload?;
    let tiers = TierSet::from_input(input)?;

    let prices = PricingService::connect()
        .await?
        .set_private_prices(ctx.tenant.id, product_id, company_id, tiers, ctx.user.user_id)
        .await?;
    Ok(ApiResponse::success(prices))
}

/// DELETE /api/v1/products/:id/prices/private/:company_id - the company
/// falls back to default prices
pub async fn private_prices_delete(
    Extension(ctx): Extension<TenantContext>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<()> {
    ctx.require_supplier_admin()?;
    let Path((product_id, company_id)) = ids?;

    PricingService::connect()
        .await?
        .delete_private_prices(ctx.tenant.id, product_id, company_id, ctx.user.user_id)
        .await?;
    Ok(ApiResponse::no_content())
}

/// GET /api/v1/products/:id/prices/history - audit log, newest first
pub async fn price_history_get(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<PriceAuditEntry>> {
    ctx.require_supplier()?;
    let Path(product_id) = id?;
    let Query(query) = query?;

    let history = PricingService::connect()
        .await?
        .price_history(ctx.tenant.id, product_id, Pagination::from_query(query))
        .await?;
    Ok(ApiResponse::success(history))
}

/// GET /api/v1/products/:id/prices/views - which companies looked at prices
pub async fn price_views_get(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<PriceView>> {
    ctx.require_supplier()?;
    let Path(product_id) = id?;
    let Query(query) = query?;

    let views = PricingService::connect()
        .await?
        .price_views(ctx.tenant.id, product_id, Pagination::from_query(query))
        .await?;
    Ok(ApiResponse::success(views))
}
