use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{check_field, conflict_on_unique, ServiceError};
use crate::auth::{
    generate_jwt, hash_password_async, validate_password_strength, verify_dummy_password_async,
    verify_password_async, Claims, IssuedToken,
};
use crate::config;
use crate::database::models::user::USER_COLUMNS;
use crate::database::models::{Tenant, User};
use crate::database::DatabaseManager;
use crate::services::TenantService;
use crate::types::{Page, Pagination, Role, TenantStatus};
use crate::validation;

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: User,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: User,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect() -> Result<Self, ServiceError> {
        Ok(Self::new(DatabaseManager::main_pool().await?))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(validation::normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, ServiceError> {
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))
    }

    /// Check credentials and tenant approval, then issue an access token
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let user = match self.find_by_email(email).await? {
            Some(user) => user,
            None => {
                verify_dummy_password_async(password.to_string()).await?;
                warn!("Login failed: unknown email");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !verify_password_async(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login refused: user disabled");
            return Err(ServiceError::Forbidden("User account is disabled".into()));
        }

        let tenant = match user.tenant_id {
            Some(tenant_id) => {
                let tenant = TenantService::new(self.pool.clone()).get(tenant_id).await?;
                match tenant.status {
                    TenantStatus::Active => {}
                    TenantStatus::Pending => {
                        info!(user_id = %user.id, tenant_id = %tenant.id, "Login refused: tenant pending");
                        return Err(ServiceError::Forbidden("Tenant is awaiting approval".into()));
                    }
                    TenantStatus::Rejected => {
                        info!(user_id = %user.id, tenant_id = %tenant.id, "Login refused: tenant rejected");
                        return Err(ServiceError::Forbidden("Tenant registration was rejected".into()));
                    }
                }
                Some(tenant)
            }
            None => None,
        };

        let user: User = sqlx::query_as(&format!(
            "UPDATE users SET last_login_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        let claims = Claims::new(
            user.id,
            user.email.clone(),
            user.role,
            user.tenant_id,
            tenant.as_ref().map(|t| t.tenant_type),
            &config::config().security,
        );
        let token = generate_jwt(&claims)?;

        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(Session { token, user, tenant })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, ServiceError> {
        let user = self.get(user_id).await?;
        let tenant = match user.tenant_id {
            Some(tenant_id) => TenantService::new(self.pool.clone()).find(tenant_id).await?,
            None => None,
        };
        Ok(Profile { user, tenant })
    }

    /// Add a user to `tenant`; the role must belong to the tenant's kind
    pub async fn create_user(&self, tenant: &Tenant, input: NewUser) -> Result<User, ServiceError> {
        if input.role.tenant_type() != Some(tenant.tenant_type) {
            return Err(ServiceError::validation(
                "role",
                format!("Role {} is not available to this tenant", input.role),
            ));
        }

        let email = validation::normalize_email(&input.email);
        let name = input.name.trim().to_string();
        check_field("email", validation::validate_email_format(&email))?;
        check_field("name", validation::validate_person_name(&name))?;
        validate_password_strength(&input.password)?;

        let password_hash = hash_password_async(input.password).await?;

        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (tenant_id, email, password_hash, name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(tenant.id)
        .bind(&email)
        .bind(&password_hash)
        .bind(&name)
        .bind(input.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "This email is already registered"))?;

        info!(tenant_id = %tenant.id, user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn list_users(&self, tenant_id: Uuid, pagination: Pagination) -> Result<Page<User>, ServiceError> {
        let users: Vec<User> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE tenant_id = $1
             ORDER BY created_at, id
             LIMIT $2 OFFSET $3"
        ))
        .bind(tenant_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(users, total, pagination))
    }

    /// Bootstrap a system-wide administrator (CLI only)
    pub async fn create_super_admin(&self, email: &str, password: &str, name: &str) -> Result<User, ServiceError> {
        let email = validation::normalize_email(email);
        let name = name.trim().to_string();
        check_field("email", validation::validate_email_format(&email))?;
        check_field("name", validation::validate_person_name(&name))?;
        validate_password_strength(password)?;

        let password_hash = hash_password_async(password.to_string()).await?;

        let user: User = sqlx::query_as(&format!(
            "INSERT INTO users (tenant_id, email, password_hash, name, role)
             VALUES (NULL, $1, $2, $3, 'super_admin')
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&email)
        .bind(&password_hash)
        .bind(&name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "This email is already registered"))?;

        info!(user_id = %user.id, "Super admin created");
        Ok(user)
    }

    /// Super admin that is still active, for admin-route guards
    pub async fn active_super_admin(&self, user_id: Uuid) -> Result<User, ServiceError> {
        let user = match self.get(user_id).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                return Err(ServiceError::Forbidden("User no longer exists".into()))
            }
            Err(e) => return Err(e),
        };
        if user.role != Role::SuperAdmin {
            return Err(ServiceError::Forbidden("Super admin access required".into()));
        }
        if !user.is_active {
            return Err(ServiceError::Forbidden("User account is disabled".into()));
        }
        Ok(user)
    }
}
