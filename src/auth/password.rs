use once_cell::sync::Lazy;

use super::AuthError;
use crate::config;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt only looks at the first 72 bytes of input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash password for storage using the configured bcrypt cost
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with_cost(password, config::config().security.bcrypt_cost)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify password against stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// `hash_password` run on the blocking pool
pub async fn hash_password_async(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

pub async fn verify_password_async(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

/// Hash at the configured cost that no submitted password matches
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("no account has this password 0").ok());

/// Spend one bcrypt verification when there is no stored hash to check, so
/// unknown emails take as long as wrong passwords
pub async fn verify_dummy_password_async(password: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = verify_password(&password, hash);
        }
    })
    .await
    .map_err(|e| AuthError::Hashing(e.to_string()))
}

pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(AuthError::WeakPassword(
            "Password must contain at least one letter and one digit".to_string(),
        ));
    }

    Ok(())
}
