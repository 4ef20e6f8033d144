use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{ProductService, ServiceError};
use crate::database::models::{PriceAuditEntry, PriceRow, PriceView, Product};
use crate::database::DatabaseManager;
use crate::pricing::{line_total, resolve_tier, Tier, TierError, TierSet};
use crate::types::{Page, Pagination, PriceAction, PriceType, TenantStatus, TenantType};

/// Tier list as stored, in a single currency
#[derive(Debug, Clone, Serialize)]
pub struct PriceList {
    pub currency: String,
    pub tiers: Vec<Tier>,
    pub updated_at: DateTime<Utc>,
}

impl PriceList {
    /// Rows must belong to one product (and one company for private rows)
    pub fn from_rows(rows: &[PriceRow]) -> Option<Self> {
        let first = rows.first()?;
        let mut tiers: Vec<Tier> = rows
            .iter()
            .map(|r| Tier {
                min_quantity: r.min_quantity,
                unit_price: r.unit_price,
            })
            .collect();
        tiers.sort_by_key(|t| t.min_quantity);

        Some(Self {
            currency: first.currency.clone(),
            tiers,
            updated_at: rows.iter().map(|r| r.updated_at).max().unwrap_or(first.updated_at),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyPriceList {
    pub company_id: Uuid,
    pub company_name: String,
    #[serde(flatten)]
    pub prices: PriceList,
}

/// Price a company pays for a quantity of one product
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub quantity: i64,
    pub price_type: PriceType,
    pub currency: String,
    pub min_quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CatalogProduct {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub supplier_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub product: CatalogProduct,
    /// `None` when the supplier has not priced the product yet
    pub price_type: Option<PriceType>,
    pub prices: Option<PriceList>,
}

#[derive(Debug, FromRow)]
struct CompanyPriceRow {
    company_name: String,
    #[sqlx(flatten)]
    price: PriceRow,
}

const DEFAULT_PRICE_COLUMNS: &str =
    "product_id, NULL::uuid AS company_id, min_quantity, unit_price, currency, updated_at";
const PRIVATE_PRICE_COLUMNS: &str = "product_id, company_id, min_quantity, unit_price, currency, updated_at";

pub struct PricingService {
    pool: PgPool,
}

impl PricingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect() -> Result<Self, ServiceError> {
        Ok(Self::new(DatabaseManager::main_pool().await?))
    }

    fn products(&self) -> ProductService {
        ProductService::new(self.pool.clone())
    }

    pub async fn get_default_prices(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<PriceList>, ServiceError> {
        self.products().get(supplier_id, product_id).await?;
        let mut conn = self.pool.acquire().await?;
        let rows = default_rows(&mut conn, product_id).await?;
        Ok(PriceList::from_rows(&rows))
    }

    /// Replace the product's default tiers and audit the change
    pub async fn set_default_prices(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
        tiers: TierSet,
        actor: Uuid,
    ) -> Result<PriceList, ServiceError> {
        let mut tx = self.pool.begin().await?;
        lock_product(&mut tx, supplier_id, product_id).await?;

        let previous = default_rows(&mut tx, product_id).await?;

        sqlx::query("DELETE FROM default_prices WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let (mins, prices) = tier_columns(&tiers);
        sqlx::query(
            "INSERT INTO default_prices (product_id, min_quantity, unit_price, currency)
             SELECT $1, t.min_quantity, t.unit_price, $4
             FROM UNNEST($2::int4[], $3::numeric[]) AS t(min_quantity, unit_price)",
        )
        .bind(product_id)
        .bind(&mins)
        .bind(&prices)
        .bind(tiers.currency())
        .execute(&mut *tx)
        .await?;

        let current = default_rows(&mut tx, product_id).await?;
        record_audit(&mut tx, product_id, None, PriceAction::SetDefault, &previous, &current, actor).await?;
        tx.commit().await?;

        info!(product_id = %product_id, actor = %actor, tiers = current.len(), "Default prices set");
        PriceList::from_rows(&current).ok_or(ServiceError::Tiers(TierError::Empty))
    }

    pub async fn list_private_prices(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<CompanyPriceList>, ServiceError> {
        self.products().get(supplier_id, product_id).await?;

        let rows: Vec<CompanyPriceRow> = sqlx::query_as(
            "SELECT t.name AS company_name, p.product_id, p.company_id, p.min_quantity,
                    p.unit_price, p.currency, p.updated_at
             FROM private_prices p
             JOIN tenants t ON t.id = p.company_id
             WHERE p.product_id = $1
             ORDER BY t.name, p.company_id, p.min_quantity",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        // Rows arrive grouped by company
        let mut lists: Vec<CompanyPriceList> = Vec::new();
        let mut group: Vec<PriceRow> = Vec::new();
        let mut current: Option<(Uuid, String)> = None;

        for row in rows {
            let company_id = row.price.company_id.unwrap_or_default();
            if current.as_ref().map(|(id, _)| *id) != Some(company_id) {
                if let Some((id, name)) = current.take() {
                    lists.extend(company_list(id, name, &group));
                }
                group.clear();
                current = Some((company_id, row.company_name.clone()));
            }
            group.push(row.price);
        }
        if let Some((id, name)) = current {
            lists.extend(company_list(id, name, &group));
        }

        Ok(lists)
    }

    /// Replace one company's private tiers for a product and audit the change
    pub async fn set_private_prices(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
        company_id: Uuid,
        tiers: TierSet,
        actor: Uuid,
    ) -> Result<PriceList, ServiceError> {
        let mut tx = self.pool.begin().await?;
        lock_product(&mut tx, supplier_id, product_id).await?;
        ensure_active_company(&mut tx, company_id).await?;

        let previous = private_rows(&mut tx, product_id, company_id).await?;

        sqlx::query("DELETE FROM private_prices WHERE product_id = $1 AND company_id = $2")
            .bind(product_id)
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        let (mins, prices) = tier_columns(&tiers);
        sqlx::query(
            "INSERT INTO private_prices (product_id, company_id, min_quantity, unit_price, currency)
             SELECT $1, $2, t.min_quantity, t.unit_price, $5
             FROM UNNEST($3::int4[], $4::numeric[]) AS t(min_quantity, unit_price)",
        )
        .bind(product_id)
        .bind(company_id)
        .bind(&mins)
        .bind(&prices)
        .bind(tiers.currency())
        .execute(&mut *tx)
        .await?;

        let current = private_rows(&mut tx, product_id, company_id).await?;
        record_audit(
            &mut tx,
            product_id,
            Some(company_id),
            PriceAction::SetPrivate,
            &previous,
            &current,
            actor,
        )
        .await?;
        tx.commit().await?;

        info!(product_id = %product_id, company_id = %company_id, actor = %actor, "Private prices set");
        PriceList::from_rows(&current).ok_or(ServiceError::Tiers(TierError::Empty))
    }

    /// Drop a company's private tiers; the company falls back to defaults
    pub async fn delete_private_prices(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
        company_id: Uuid,
        actor: Uuid,
    ) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        lock_product(&mut tx, supplier_id, product_id).await?;

        let previous = private_rows(&mut tx, product_id, company_id).await?;
        if previous.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "No private prices for company {} on this product",
                company_id
            )));
        }

        sqlx::query("DELETE FROM private_prices WHERE product_id = $1 AND company_id = $2")
            .bind(product_id)
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        record_audit(
            &mut tx,
            product_id,
            Some(company_id),
            PriceAction::DeletePrivate,
            &previous,
            &[],
            actor,
        )
        .await?;
        tx.commit().await?;

        info!(product_id = %product_id, company_id = %company_id, actor = %actor, "Private prices deleted");
        Ok(())
    }

    pub async fn price_history(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<PriceAuditEntry>, ServiceError> {
        self.products().get(supplier_id, product_id).await?;

        let entries: Vec<PriceAuditEntry> = sqlx::query_as(
            "SELECT id, product_id, company_id, action, previous, current, changed_by, created_at
             FROM price_audit_logs
             WHERE product_id = $1
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3",
        )
        .bind(product_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM price_audit_logs WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(entries, total, pagination))
    }

    pub async fn price_views(
        &self,
        supplier_id: Uuid,
        product_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<PriceView>, ServiceError> {
        self.products().get(supplier_id, product_id).await?;

        let views: Vec<PriceView> = sqlx::query_as(
            "SELECT v.id, v.product_id, v.company_id, t.name AS company_name, v.user_id,
                    v.quantity, v.unit_price, v.price_type, v.viewed_at
             FROM price_views v
             JOIN tenants t ON t.id = v.company_id
             WHERE v.product_id = $1
             ORDER BY v.viewed_at DESC, v.id
             LIMIT $2 OFFSET $3",
        )
        .bind(product_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM price_views WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(views, total, pagination))
    }

    /// Price `quantity` units for a company and record the view
    pub async fn quote(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> Result<Quote, ServiceError> {
        if quantity < 1 || quantity > i64::from(i32::MAX) {
            return Err(TierError::InvalidQuantity(quantity).into());
        }

        let product: Product = sqlx::query_as(
            "SELECT p.id, p.supplier_id, p.sku, p.name, p.description, p.unit, p.is_active,
                    p.created_at, p.updated_at
             FROM products p
             JOIN tenants s ON s.id = p.supplier_id
             WHERE p.id = $1 AND p.is_active AND s.status = $2",
        )
        .bind(product_id)
        .bind(TenantStatus::Active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let mut conn = self.pool.acquire().await?;
        let (price_type, rows) = effective_rows(&mut conn, product_id, company_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No price is available for this product".into()))?;

        let tiers: Vec<Tier> = rows
            .iter()
            .map(|r| Tier {
                min_quantity: r.min_quantity,
                unit_price: r.unit_price,
            })
            .collect();
        let tier = *resolve_tier(&tiers, quantity)?;
        let currency = rows[0].currency.clone();

        sqlx::query(
            "INSERT INTO price_views (product_id, company_id, user_id, quantity, unit_price, price_type)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(product_id)
        .bind(company_id)
        .bind(user_id)
        .bind(quantity as i32)
        .bind(tier.unit_price)
        .bind(price_type)
        .execute(&mut *conn)
        .await?;

        Ok(Quote {
            product_id: product.id,
            sku: product.sku,
            name: product.name,
            unit: product.unit,
            quantity,
            price_type,
            currency,
            min_quantity: tier.min_quantity,
            unit_price: tier.unit_price,
            total: line_total(tier.unit_price, quantity),
        })
    }

    /// Active products of active suppliers with the company's effective tiers
    pub async fn catalog(
        &self,
        company_id: Uuid,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<Page<CatalogItem>, ServiceError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let products: Vec<CatalogProduct> = sqlx::query_as(
            "SELECT p.id, p.supplier_id, p.sku, p.name, p.description, p.unit, p.is_active,
                    p.created_at, p.updated_at, s.name AS supplier_name
             FROM products p
             JOIN tenants s ON s.id = p.supplier_id
             WHERE p.is_active AND s.status = $1
               AND ($2::text IS NULL OR p.name ILIKE $2 OR p.sku ILIKE $2)
             ORDER BY s.name, p.name, p.id
             LIMIT $3 OFFSET $4",
        )
        .bind(TenantStatus::Active)
        .bind(&pattern)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM products p
             JOIN tenants s ON s.id = p.supplier_id
             WHERE p.is_active AND s.status = $1
               AND ($2::text IS NULL OR p.name ILIKE $2 OR p.sku ILIKE $2)",
        )
        .bind(TenantStatus::Active)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let ids: Vec<Uuid> = products.iter().map(|p| p.product.id).collect();

        let private: Vec<PriceRow> = sqlx::query_as(&format!(
            "SELECT {PRIVATE_PRICE_COLUMNS} FROM private_prices
             WHERE company_id = $1 AND product_id = ANY($2)"
        ))
        .bind(company_id)
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let defaults: Vec<PriceRow> = sqlx::query_as(&format!(
            "SELECT {DEFAULT_PRICE_COLUMNS} FROM default_prices WHERE product_id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let private = group_by_product(private);
        let defaults = group_by_product(defaults);

        let items = products
            .into_iter()
            .map(|product| {
                let id = product.product.id;
                let (price_type, prices) = match (private.get(&id), defaults.get(&id)) {
                    (Some(rows), _) => (Some(PriceType::Private), PriceList::from_rows(rows)),
                    (None, Some(rows)) => (Some(PriceType::Default), PriceList::from_rows(rows)),
                    (None, None) => (None, None),
                };
                CatalogItem {
                    product,
                    price_type,
                    prices,
                }
            })
            .collect();

        Ok(Page::new(items, total, pagination))
    }
}

/// Lock the supplier's product row for the rest of the transaction so
/// concurrent tier replacements apply one after another
async fn lock_product(conn: &mut PgConnection, supplier_id: Uuid, product_id: Uuid) -> Result<(), ServiceError> {
    let found: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM products WHERE id = $1 AND supplier_id = $2 FOR UPDATE")
            .bind(product_id)
            .bind(supplier_id)
            .fetch_optional(conn)
            .await?;

    found
        .map(|_| ())
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
}

async fn ensure_active_company(conn: &mut PgConnection, company_id: Uuid) -> Result<(), ServiceError> {
    let tenant: Option<(TenantType, TenantStatus)> =
        sqlx::query_as("SELECT tenant_type, status FROM tenants WHERE id = $1")
            .bind(company_id)
            .fetch_optional(conn)
            .await?;

    match tenant {
        Some((TenantType::Company, TenantStatus::Active)) => Ok(()),
        _ => Err(ServiceError::BadRequest(
            "Private prices can only be set for active company tenants".into(),
        )),
    }
}

async fn default_rows(conn: &mut PgConnection, product_id: Uuid) -> Result<Vec<PriceRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {DEFAULT_PRICE_COLUMNS} FROM default_prices WHERE product_id = $1 ORDER BY min_quantity"
    ))
    .bind(product_id)
    .fetch_all(conn)
    .await
}

async fn private_rows(
    conn: &mut PgConnection,
    product_id: Uuid,
    company_id: Uuid,
) -> Result<Vec<PriceRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {PRIVATE_PRICE_COLUMNS} FROM private_prices
         WHERE product_id = $1 AND company_id = $2
         ORDER BY min_quantity"
    ))
    .bind(product_id)
    .bind(company_id)
    .fetch_all(conn)
    .await
}

/// Private tiers when the company has any for the product, else defaults
async fn effective_rows(
    conn: &mut PgConnection,
    product_id: Uuid,
    company_id: Uuid,
) -> Result<Option<(PriceType, Vec<PriceRow>)>, sqlx::Error> {
    let private = private_rows(&mut *conn, product_id, company_id).await?;
    if !private.is_empty() {
        return Ok(Some((PriceType::Private, private)));
    }

    let defaults = default_rows(conn, product_id).await?;
    if !defaults.is_empty() {
        return Ok(Some((PriceType::Default, defaults)));
    }

    Ok(None)
}

async fn record_audit(
    conn: &mut PgConnection,
    product_id: Uuid,
    company_id: Option<Uuid>,
    action: PriceAction,
    previous: &[PriceRow],
    current: &[PriceRow],
    actor: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO price_audit_logs (product_id, company_id, action, previous, current, changed_by)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(product_id)
    .bind(company_id)
    .bind(action)
    .bind(snapshot(previous))
    .bind(snapshot(current))
    .bind(actor)
    .execute(conn)
    .await?;
    Ok(())
}

/// Audit-log form of a tier list
fn snapshot(rows: &[PriceRow]) -> Value {
    match PriceList::from_rows(rows) {
        Some(list) => json!({ "currency": list.currency, "tiers": list.tiers }),
        None => json!({ "tiers": [] }),
    }
}

fn tier_columns(tiers: &TierSet) -> (Vec<i32>, Vec<Decimal>) {
    tiers.tiers().iter().map(|t| (t.min_quantity, t.unit_price)).unzip()
}

fn company_list(company_id: Uuid, company_name: String, rows: &[PriceRow]) -> Option<CompanyPriceList> {
    PriceList::from_rows(rows).map(|prices| CompanyPriceList {
        company_id,
        company_name,
        prices,
    })
}

fn group_by_product(rows: Vec<PriceRow>) -> HashMap<Uuid, Vec<PriceRow>> {
    let mut grouped: HashMap<Uuid, Vec<PriceRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row);
    }
    grouped
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
