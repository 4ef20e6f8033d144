// handlers/protected/products/product.rs - /api/v1/products[/:id]

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Product;
use crate::middleware::{ApiResponse, ApiResult, TenantContext};
use crate::services::product_service::{NewProduct, ProductPatch};
use crate::services::ProductService;
use crate::types::{Page, PageQuery, Pagination};

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub include_inactive: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/v1/products - the supplier's own products
pub async fn products_list(
    Extension(ctx): Extension<TenantContext>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> ApiResult<Page<Product>> {
    ctx.require_supplier()?;
    let Query(query) = query?;
    let pagination = Pagination::from_query(PageQuery {
        page: query.page,
        limit: query.limit,
    });

    let products = ProductService::connect()
        .await?
        .list(ctx.tenant.id, query.include_inactive.unwrap_or(false), pagination)
        .await?;
    Ok(ApiResponse::success(products))
}

/// POST /api/v1/products
pub async fn product_create(
    Extension(ctx): Extension<TenantContext>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<Product> {
    ctx.require_supplier_admin()?;
    let Json(input) = payload?;

    let product = ProductService::connect().await?.create(ctx.tenant.id, input).await?;
    Ok(ApiResponse::created(product))
}

/// GET /api/v1/products/:id
pub async fn product_get(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Product> {
    ctx.require_supplier()?;
    let Path(id) = id?;

    let product = ProductService::connect().await?.get(ctx.tenant.id, id).await?;
    Ok(ApiResponse::success(product))
}

/// PATCH /api/v1/products/:id
pub async fn product_patch(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> ApiResult<Product> {
    ctx.require_supplier_admin()?;
    let Path(id) = id?;
    let Json(patch) = payload?;

    let product = ProductService::connect().await?.update(ctx.tenant.id, id, patch).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/v1/products/:id - soft delete; the row and its price
/// history are kept
pub async fn product_delete(
    Extension(ctx): Extension<TenantContext>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Product> {
    ctx.require_supplier_admin()?;
    let Path(id) = id?;

    let product = ProductService::connect().await?.deactivate(ctx.tenant.id, id).await?;
    tracing::info!(actor = %ctx.user.user_id, product_id = %product.id, "Product deactivated");
    Ok(ApiResponse::success(product))
}
