// handlers/protected/catalog.rs - /api/v1/catalog (companies)

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query,
    },
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, TenantContext};
use crate::services::pricing_service::{CatalogItem, Quote};
use crate::services::PricingService;
use crate::types::{Page, PageQuery, Pagination};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Matches product name or SKU
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub quantity: i64,
}

/// GET /api/v1/catalog - products with the prices this company pays
pub async fn catalog_get(
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> ApiResult<Page<CatalogItem>> {
    ctx.require_company()?;
    let Query(query) = query?;
    let pagination = Pagination::from_query(PageQuery {
        page: query.page,
        limit: query.limit,
    });

    let catalog = PricingService::connect()
        .await?
        .catalog(ctx.tenant.id, query.q.as_deref(), pagination)
        .await?;
    Ok(ApiResponse::success(catalog))
}

/// GET /api/v1/catalog/:product_id/quote?quantity=N
pub async fn quote_get(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<QuoteQuery>, QueryRejection>,
) -> ApiResult<Quote> {
    ctx.require_company()?;
    let Path(product_id) = id?;
    let Query(query) = query?;

    let quote = PricingService::connect()
        .await?
        .quote(ctx.tenant.id, ctx.user.user_id, product_id, query.quantity)
        .await?;
    Ok(ApiResponse::success(quote))
}
