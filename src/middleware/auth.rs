use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{validate_jwt, AuthError, Claims};
use crate::error::ApiError;
use crate::services::UserService;
use crate::types::{Role, TenantType};

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
    pub tenant_type: Option<TenantType>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tenant_id,
            tenant_type: claims.tenant_type,
        }
    }
}

impl AuthUser {
    /// 403 unless the caller holds one of `roles`
    pub fn require_role(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "Role {} may not perform this action",
                self.role
            )))
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers)?;

    let claims = validate_jwt(token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::from(e)
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!(user_id = %auth_user.user_id, role = %auth_user.role, "Authenticated request");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Admin routes: the token must carry the super admin role and the account
/// must still be an active super admin
pub async fn require_super_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = authenticated(&request)?;
    if !auth_user.is_super_admin() {
        tracing::warn!(user_id = %auth_user.user_id, role = %auth_user.role, "Admin route refused");
        return Err(ApiError::forbidden("Super admin access required"));
    }

    UserService::connect()
        .await?
        .active_super_admin(auth_user.user_id)
        .await?;

    Ok(next.run(request).await)
}

/// AuthUser inserted by `jwt_auth_middleware`
pub(crate) fn authenticated(request: &Request) -> Result<AuthUser, ApiError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "a@example.com".into(),
            role,
            tenant_id: None,
            tenant_type: None,
        }
    }

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_malformed_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(extract_jwt_from_headers(&headers), Err(AuthError::MissingToken)));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(matches!(extract_jwt_from_headers(&headers), Err(AuthError::MalformedHeader)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(matches!(extract_jwt_from_headers(&headers), Err(AuthError::MalformedHeader)));
    }

    #[test]
    fn require_role_checks_membership() {
        let admin = user(Role::SupplierAdmin);
        assert!(admin.require_role(&[Role::SupplierAdmin]).is_ok());
        assert!(admin.require_role(&[Role::CompanyAdmin, Role::CompanyUser]).is_err());
        assert!(user(Role::SuperAdmin).is_super_admin());
    }
}
