// handlers/protected/auth/me.rs - GET /api/v1/auth/me handler

use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::user_service::Profile;
use crate::services::UserService;

/// GET /api/v1/auth/me - current user with tenant summary
pub async fn me_get(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Profile> {
    let profile = UserService::connect().await?.profile(auth_user.user_id).await?;
    Ok(ApiResponse::success(profile))
}
