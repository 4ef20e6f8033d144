use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{check_field, conflict_on_unique, ServiceError};
use crate::auth::{hash_password_async, validate_password_strength};
use crate::database::models::tenant::TENANT_COLUMNS;
use crate::database::models::user::USER_COLUMNS;
use crate::database::models::{Tenant, User};
use crate::database::DatabaseManager;
use crate::types::{Page, Pagination, Role, TenantStatus, TenantType};
use crate::validation;

/// Self-service registration of a tenant and its first admin
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterTenant {
    pub tenant_name: String,
    pub tenant_type: TenantType,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub tenant: Tenant,
    pub user: User,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TenantFilter {
    pub status: Option<TenantStatus>,
    pub tenant_type: Option<TenantType>,
}

pub struct TenantService {
    pool: PgPool,
}

impl TenantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Service over the shared pool
    pub async fn connect() -> Result<Self, ServiceError> {
        Ok(Self::new(DatabaseManager::main_pool().await?))
    }

    /// Create a pending tenant and its admin user atomically
    pub async fn register(&self, input: RegisterTenant) -> Result<Registration, ServiceError> {
        let tenant_name = input.tenant_name.trim().to_string();
        let email = validation::normalize_email(&input.email);
        let name = input.name.trim().to_string();

        check_field("tenant_name", validation::validate_tenant_name(&tenant_name))?;
        check_field("email", validation::validate_email_format(&email))?;
        check_field("name", validation::validate_person_name(&name))?;
        validate_password_strength(&input.password)?;

        let password_hash = hash_password_async(input.password).await?;

        let mut tx = self.pool.begin().await?;

        let tenant: Tenant = sqlx::query_as(&format!(
            "INSERT INTO tenants (name, tenant_type, status, contact_email)
             VALUES ($1, $2, 'pending', $3)
             RETURNING {TENANT_COLUMNS}"
        ))
        .bind(&tenant_name)
        .bind(input.tenant_type)
        .bind(&email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "A tenant with this name already exists"))?;

        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (tenant_id, email, password_hash, name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(tenant.id)
        .bind(&email)
        .bind(&password_hash)
        .bind(&name)
        .bind(Role::admin_for(input.tenant_type))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "This email is already registered"))?;

        tx.commit().await?;

        info!(
            tenant_id = %tenant.id,
            user_id = %user.id,
            tenant_type = ?tenant.tenant_type,
            "Tenant registered, awaiting approval"
        );

        Ok(Registration { tenant, user })
    }

    pub async fn list(
        &self,
        filter: TenantFilter,
        pagination: Pagination,
    ) -> Result<Page<Tenant>, ServiceError> {
        let tenants: Vec<Tenant> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS}
             FROM tenants
             WHERE ($1::tenant_status IS NULL OR status = $1)
               AND ($2::tenant_type IS NULL OR tenant_type = $2)
             ORDER BY created_at DESC, id
             LIMIT $3 OFFSET $4"
        ))
        .bind(filter.status)
        .bind(filter.tenant_type)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM tenants
             WHERE ($1::tenant_status IS NULL OR status = $1)
               AND ($2::tenant_type IS NULL OR tenant_type = $2)",
        )
        .bind(filter.status)
        .bind(filter.tenant_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(tenants, total, pagination))
    }

    pub async fn list_pending(&self, pagination: Pagination) -> Result<Page<Tenant>, ServiceError> {
        let filter = TenantFilter {
            status: Some(TenantStatus::Pending),
            tenant_type: None,
        };
        self.list(filter, pagination).await
    }

    /// Active companies, for suppliers picking private-price targets
    pub async fn list_active_companies(&self, pagination: Pagination) -> Result<Page<Tenant>, ServiceError> {
        let filter = TenantFilter {
            status: Some(TenantStatus::Active),
            tenant_type: Some(TenantType::Company),
        };
        self.list(filter, pagination).await
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Tenant>, ServiceError> {
        let tenant = sqlx::query_as(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    pub async fn get(&self, id: Uuid) -> Result<Tenant, ServiceError> {
        self.find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Tenant {} not found", id)))
    }

    /// pending -> active
    pub async fn approve(&self, id: Uuid, reviewer: Uuid) -> Result<Tenant, ServiceError> {
        let updated: Option<Tenant> = sqlx::query_as(&format!(
            "UPDATE tenants
             SET status = 'active', reviewed_at = now(), reviewed_by = $2,
                 rejection_reason = NULL, updated_at = now()
             WHERE id = $1 AND status = 'pending'
             RETURNING {TENANT_COLUMNS}"
        ))
        .bind(id)
        .bind(reviewer)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(tenant) => {
                info!(tenant_id = %tenant.id, reviewer = %reviewer, "Tenant approved");
                Ok(tenant)
            }
            None => Err(self.transition_failure(id, "approved").await),
        }
    }

    /// pending -> rejected
    pub async fn reject(
        &self,
        id: Uuid,
        reviewer: Uuid,
        reason: Option<String>,
    ) -> Result<Tenant, ServiceError> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(reason) = &reason {
            check_field("reason", validation::validate_rejection_reason(reason))?;
        }

        let updated: Option<Tenant> = sqlx::query_as(&format!(
            "UPDATE tenants
             SET status = 'rejected', reviewed_at = now(), reviewed_by = $2,
                 rejection_reason = $3, updated_at = now()
             WHERE id = $1 AND status = 'pending'
             RETURNING {TENANT_COLUMNS}"
        ))
        .bind(id)
        .bind(reviewer)
        .bind(&reason)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(tenant) => {
                info!(tenant_id = %tenant.id, reviewer = %reviewer, "Tenant rejected");
                Ok(tenant)
            }
            None => Err(self.transition_failure(id, "rejected").await),
        }
    }

    /// Explain why a pending-only transition matched no row
    async fn transition_failure(&self, id: Uuid, verb: &str) -> ServiceError {
        match self.find(id).await {
            Ok(Some(tenant)) => {
                warn!(tenant_id = %id, status = %tenant.status, "Tenant cannot be {}", verb);
                ServiceError::Conflict(format!(
                    "Only pending tenants can be {}; tenant is {}",
                    verb, tenant.status
                ))
            }
            Ok(None) => ServiceError::NotFound(format!("Tenant {} not found", id)),
            Err(e) => e,
        }
    }

    /// Tenant of an authenticated user, if the tenant and the user are both
    /// still allowed in
    pub async fn active_membership(&self, user_id: Uuid, tenant_id: Uuid) -> Result<Tenant, ServiceError> {
        let row: Option<(bool, Option<Uuid>)> =
            sqlx::query_as("SELECT is_active, tenant_id FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((true, Some(member_of))) if member_of == tenant_id => {}
            Some((false, _)) => return Err(ServiceError::Forbidden("User account is disabled".into())),
            _ => return Err(ServiceError::Forbidden("User does not belong to this tenant".into())),
        }

        let tenant = self
            .find(tenant_id)
            .await?
            .ok_or_else(|| ServiceError::Forbidden("Tenant no longer exists".into()))?;

        match tenant.status {
            TenantStatus::Active => Ok(tenant),
            TenantStatus::Pending => Err(ServiceError::Forbidden("Tenant is awaiting approval".into())),
            TenantStatus::Rejected => Err(ServiceError::Forbidden("Tenant registration was rejected".into())),
        }
    }
}
