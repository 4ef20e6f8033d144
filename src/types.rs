/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of organization a tenant represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "tenant_type", rename_all = "snake_case")]
pub enum TenantType {
    Supplier,
    Company,
}

impl fmt::Display for TenantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TenantType::Supplier => "supplier",
            TenantType::Company => "company",
        })
    }
}

/// Approval lifecycle of a tenant: pending -> active | rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "tenant_status", rename_all = "snake_case")]
pub enum TenantStatus {
    Pending,
    Active,
    Rejected,
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TenantStatus::Pending => "pending",
            TenantStatus::Active => "active",
            TenantStatus::Rejected => "rejected",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    SupplierAdmin,
    SupplierUser,
    CompanyAdmin,
    CompanyUser,
}

impl Role {
    /// Tenant kind this role belongs to. `None` for system-wide roles.
    pub fn tenant_type(self) -> Option<TenantType> {
        match self {
            Role::SuperAdmin => None,
            Role::SupplierAdmin | Role::SupplierUser => Some(TenantType::Supplier),
            Role::CompanyAdmin | Role::CompanyUser => Some(TenantType::Company),
        }
    }

    /// Role given to the first user of a newly registered tenant
    pub fn admin_for(tenant_type: TenantType) -> Role {
        match tenant_type {
            TenantType::Supplier => Role::SupplierAdmin,
            TenantType::Company => Role::CompanyAdmin,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::SupplierAdmin => "supplier_admin",
            Role::SupplierUser => "supplier_user",
            Role::CompanyAdmin => "company_admin",
            Role::CompanyUser => "company_user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier list produced a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "price_type", rename_all = "snake_case")]
pub enum PriceType {
    Default,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "price_action", rename_all = "snake_case")]
pub enum PriceAction {
    SetDefault,
    SetPrivate,
    DeletePrivate,
}

/// Page request as received from query strings (`?page=&limit=`)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Normalized page window, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(query: PageQuery, default_limit: u32, max_limit: u32) -> Self {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));
        Self { page, limit }
    }

    pub fn from_query(query: PageQuery) -> Self {
        let api = &crate::config::config().api;
        Self::new(query, api.default_page_size, api.max_page_size)
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn limit(&self) -> i64 {
        self.limit as i64
    }
}

/// One page of results plus the totals a table UI needs
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            ((total as u64 + pagination.limit as u64 - 1) / pagination.limit as u64) as u32
        };
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages,
        }
    }
}
