// handlers/public/auth/login.rs - POST /api/v1/auth/login handler

use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::Session;
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth/login - exchange credentials for a bearer token
pub async fn login_post(payload: Result<Json<LoginRequest>, JsonRejection>) -> ApiResult<Session> {
    let Json(request) = payload?;
    let session = UserService::connect()
        .await?
        .login(&request.email, &request.password)
        .await?;
    Ok(ApiResponse::success(session))
}
