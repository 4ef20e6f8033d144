//! Tiered price lists.
//!
//! A tier list maps a minimum order quantity to a unit price. The price that
//! applies to a quantity is the one from the tier with the greatest
//! `min_quantity` not exceeding it. Every list starts at quantity 1, so any
//! positive quantity resolves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_TIERS: usize = 50;

/// Digits kept after the decimal point (matches NUMERIC(14, 4))
pub const PRICE_SCALE: u32 = 4;

/// Exclusive upper bound for a unit price (NUMERIC(14, 4) keeps 10 integer digits)
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(0x540B_E400, 2, 0, false, 0); // 10_000_000_000

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub min_quantity: i32,
    pub unit_price: Decimal,
}

/// Validated, sorted tier list in a single currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierSet {
    currency: String,
    tiers: Vec<Tier>,
}

/// Request body for replacing a tier list
#[derive(Debug, Clone, Deserialize)]
pub struct TierSetInput {
    pub currency: String,
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierError {
    #[error("At least one price tier is required")]
    Empty,

    #[error("At most {MAX_TIERS} price tiers are allowed, got {0}")]
    TooMany(usize),

    #[error("Minimum quantity must be at least 1, got {0}")]
    InvalidMinQuantity(i32),

    #[error("Minimum quantity {0} appears more than once")]
    DuplicateMinQuantity(i32),

    #[error("Unit price for minimum quantity {0} must be greater than zero")]
    NonPositivePrice(i32),

    #[error("Unit price for minimum quantity {0} has more than {PRICE_SCALE} decimal places")]
    TooPrecise(i32),

    #[error("Unit price for minimum quantity {0} must be less than {MAX_UNIT_PRICE}")]
    PriceTooLarge(i32),

    #[error("A tier with minimum quantity 1 is required")]
    MissingBaseTier,

    #[error("Currency must be a three-letter ISO 4217 code, got '{0}'")]
    InvalidCurrency(String),

    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
}

impl TierError {
    /// Request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            TierError::InvalidCurrency(_) => "currency",
            TierError::InvalidQuantity(_) => "quantity",
            _ => "tiers",
        }
    }
}

impl TierSet {
    pub fn new(currency: &str, tiers: Vec<Tier>) -> Result<Self, TierError> {
        let currency = normalize_currency(currency)?;

        if tiers.is_empty() {
            return Err(TierError::Empty);
        }
        if tiers.len() > MAX_TIERS {
            return Err(TierError::TooMany(tiers.len()));
        }

        let mut tiers = tiers;
        tiers.sort_by_key(|t| t.min_quantity);

        for (i, tier) in tiers.iter().enumerate() {
            if tier.min_quantity < 1 {
                return Err(TierError::InvalidMinQuantity(tier.min_quantity));
            }
            if i > 0 && tiers[i - 1].min_quantity == tier.min_quantity {
                return Err(TierError::DuplicateMinQuantity(tier.min_quantity));
            }
            if tier.unit_price <= Decimal::ZERO {
                return Err(TierError::NonPositivePrice(tier.min_quantity));
            }
            if tier.unit_price.normalize().scale() > PRICE_SCALE {
                return Err(TierError::TooPrecise(tier.min_quantity));
            }
            if tier.unit_price >= MAX_UNIT_PRICE {
                return Err(TierError::PriceTooLarge(tier.min_quantity));
            }
        }

        if tiers[0].min_quantity != 1 {
            return Err(TierError::MissingBaseTier);
        }

        Ok(Self { currency, tiers })
    }

    pub fn from_input(input: TierSetInput) -> Result<Self, TierError> {
        Self::new(&input.currency, input.tiers)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Tier applying to `quantity`
    pub fn tier_for(&self, quantity: i64) -> Result<&Tier, TierError> {
        resolve_tier(&self.tiers, quantity)
    }
}

fn normalize_currency(raw: &str) -> Result<String, TierError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err(TierError::InvalidCurrency(raw.to_string()))
    }
}

/// Pick the tier with the greatest `min_quantity <= quantity`. `tiers` need
/// not be sorted.
pub fn resolve_tier(tiers: &[Tier], quantity: i64) -> Result<&Tier, TierError> {
    if quantity < 1 {
        return Err(TierError::InvalidQuantity(quantity));
    }
    tiers
        .iter()
        .filter(|t| i64::from(t.min_quantity) <= quantity)
        .max_by_key(|t| t.min_quantity)
        .ok_or(TierError::MissingBaseTier)
}

/// Line total for `quantity` units at `unit_price`
pub fn line_total(unit_price: Decimal, quantity: i64) -> Decimal {
    (unit_price * Decimal::from(quantity)).round_dp(PRICE_SCALE)
}
