pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{self, SecurityConfig, MAX_JWT_EXPIRY_HOURS};
use crate::types::{Role, TenantType};

pub use password::{
    hash_password, hash_password_async, validate_password_strength, verify_dummy_password_async, verify_password,
    verify_password_async,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("{0}")]
    WeakPassword(String),
}

/// JWT claims carried by every access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
    pub tenant_type: Option<TenantType>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        email: String,
        role: Role,
        tenant_id: Option<Uuid>,
        tenant_type: Option<TenantType>,
        security: &SecurityConfig,
    ) -> Self {
        let now = Utc::now();
        let hours = security.jwt_expiry_hours.min(MAX_JWT_EXPIRY_HOURS) as i64;
        let exp = (now + Duration::hours(hours)).timestamp();

        Self {
            sub: user_id,
            email,
            role,
            tenant_id,
            tenant_type,
            iss: security.jwt_issuer.clone(),
            iat: now.timestamp(),
            exp,
        }
    }
}

/// Signed token plus its lifetime, as returned by login
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub fn generate_jwt(claims: &Claims) -> Result<IssuedToken, AuthError> {
    generate_jwt_with(claims, &config::config().security)
}

pub fn generate_jwt_with(claims: &Claims, security: &SecurityConfig) -> Result<IssuedToken, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    let token = encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

    Ok(IssuedToken {
        token,
        token_type: "Bearer",
        expires_in: (claims.exp - claims.iat).max(0),
    })
}

pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    validate_jwt_with(token, &config::config().security)
}

pub fn validate_jwt_with(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[security.jwt_issuer.as_str()]);
    validation.leeway = 0;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken(e.to_string()),
        })
}
