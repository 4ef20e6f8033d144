pub mod pricing_service;
pub mod product_service;
pub mod tenant_service;
pub mod user_service;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::pricing::TierError;

pub use pricing_service::PricingService;
pub use product_service::ProductService;
pub use tenant_service::TenantService;
pub use user_service::UserService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Tiers(#[from] TierError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Lift a `validation::*` check result into a field error
pub(crate) fn check_field(field: &str, result: Result<(), String>) -> Result<(), ServiceError> {
    result.map_err(|message| ServiceError::validation(field, message))
}

/// Turn a unique-constraint violation into a 409 with a readable message;
/// other errors pass through
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ServiceError::Conflict(message.to_string())
        }
        _ => ServiceError::Sqlx(err),
    }
}
