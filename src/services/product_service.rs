use serde::{Deserialize, Deserializer};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{check_field, conflict_on_unique, ServiceError};
use crate::database::models::product::PRODUCT_COLUMNS;
use crate::database::models::Product;
use crate::database::DatabaseManager;
use crate::types::{Page, Pagination};
use crate::validation;

const DUPLICATE_SKU: &str = "A product with this SKU already exists";

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
}

/// Partial update; absent fields are left unchanged. `"description": null`
/// clears the description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub unit: Option<String>,
    pub is_active: Option<bool>,
}

pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect() -> Result<Self, ServiceError> {
        Ok(Self::new(DatabaseManager::main_pool().await?))
    }

    pub async fn create(&self, supplier_id: Uuid, input: NewProduct) -> Result<Product, ServiceError> {
        let sku = input.sku.trim().to_string();
        let name = input.name.trim().to_string();
        check_field("sku", validation::validate_sku(&sku))?;
        check_field("name", validation::validate_product_name(&name))?;
        let unit = normalize_unit(input.unit)?;

        let product: Product = sqlx::query_as(&format!(
            "INSERT INTO products (supplier_id, sku, name, description, unit)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'each'))
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(supplier_id)
        .bind(&sku)
        .bind(&name)
        .bind(&input.description)
        .bind(&unit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SKU))?;

        info!(supplier_id = %supplier_id, product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn list(
        &self,
        supplier_id: Uuid,
        include_inactive: bool,
        pagination: Pagination,
    ) -> Result<Page<Product>, ServiceError> {
        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE supplier_id = $1 AND ($2 OR is_active)
             ORDER BY name, sku
             LIMIT $3 OFFSET $4"
        ))
        .bind(supplier_id)
        .bind(include_inactive)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE supplier_id = $1 AND ($2 OR is_active)")
                .bind(supplier_id)
                .bind(include_inactive)
                .fetch_one(&self.pool)
                .await?;

        Ok(Page::new(products, total, pagination))
    }

    /// Product owned by `supplier_id`; other suppliers' products are
    /// reported as missing
    pub async fn get(&self, supplier_id: Uuid, id: Uuid) -> Result<Product, ServiceError> {
        sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND supplier_id = $2"
        ))
        .bind(id)
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| product_not_found(id))
    }

    pub async fn update(&self, supplier_id: Uuid, id: Uuid, patch: ProductPatch) -> Result<Product, ServiceError> {
        let sku = patch.sku.map(|s| s.trim().to_string());
        let name = patch.name.map(|s| s.trim().to_string());
        if let Some(sku) = &sku {
            check_field("sku", validation::validate_sku(sku))?;
        }
        if let Some(name) = &name {
            check_field("name", validation::validate_product_name(name))?;
        }
        let unit = normalize_unit(patch.unit)?;
        let set_description = patch.description.is_some();
        let description = patch.description.flatten();

        let product: Option<Product> = sqlx::query_as(&format!(
            "UPDATE products SET
                 sku = COALESCE($3, sku),
                 name = COALESCE($4, name),
                 description = CASE WHEN $8 THEN $5 ELSE description END,
                 unit = COALESCE($6, unit),
                 is_active = COALESCE($7, is_active),
                 updated_at = now()
             WHERE id = $1 AND supplier_id = $2
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(supplier_id)
        .bind(&sku)
        .bind(&name)
        .bind(&description)
        .bind(&unit)
        .bind(patch.is_active)
        .bind(set_description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_SKU))?;

        let product = product.ok_or_else(|| product_not_found(id))?;
        info!(supplier_id = %supplier_id, product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Hide a product from catalogs; prices are kept
    pub async fn deactivate(&self, supplier_id: Uuid, id: Uuid) -> Result<Product, ServiceError> {
        let patch = ProductPatch {
            is_active: Some(false),
            ..ProductPatch::default()
        };
        self.update(supplier_id, id, patch).await
    }
}

/// Distinguishes an explicit `null` from an absent field
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn product_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Product {} not found", id))
}

fn normalize_unit(unit: Option<String>) -> Result<Option<String>, ServiceError> {
    match unit.map(|u| u.trim().to_string()) {
        Some(u) if u.is_empty() => Err(ServiceError::validation("unit", "Unit cannot be empty")),
        Some(u) if u.chars().count() > 32 => {
            Err(ServiceError::validation("unit", "Unit must be at most 32 characters"))
        }
        other => Ok(other),
    }
}
