use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{PriceAction, PriceType};

/// One tier row from either default_prices or private_prices
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceRow {
    pub product_id: Uuid,
    /// `None` for default prices
    pub company_id: Option<Uuid>,
    pub min_quantity: i32,
    pub unit_price: Decimal,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceAuditEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub company_id: Option<Uuid>,
    pub action: PriceAction,
    pub previous: serde_json::Value,
    pub current: serde_json::Value,
    pub changed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub user_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub price_type: PriceType,
    pub viewed_at: DateTime<Utc>,
}
