use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{TenantStatus, TenantType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub tenant_type: TenantType,
    pub status: TenantStatus,
    pub contact_email: String,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list matching `Tenant`'s fields
pub const TENANT_COLUMNS: &str = "id, name, tenant_type, status, contact_email, rejection_reason, \
     reviewed_at, reviewed_by, created_at, updated_at";
