// handlers/elevated/tenants/review.rs - POST /api/v1/admin/tenants/:id/{approve,reject}

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path,
    },
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Tenant;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::TenantService;

#[derive(Debug, Default, Deserialize)]
pub struct RejectTenant {
    pub reason: Option<String>,
}

/// POST /api/v1/admin/tenants/:id/approve - pending -> active
pub async fn tenant_approve(
    Extension(admin): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Tenant> {
    let Path(id) = id?;
    let tenant = TenantService::connect().await?.approve(id, admin.user_id).await?;
    Ok(ApiResponse::success(tenant))
}

/// POST /api/v1/admin/tenants/:id/reject - pending -> rejected
///
/// Body `{ "reason": "..." }` is optional.
pub async fn tenant_reject(
    Extension(admin): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<Tenant> {
    let Path(id) = id?;
    let payload = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let body = parse_reject_body(&payload)?;

    let tenant = TenantService::connect()
        .await?
        .reject(id, admin.user_id, body.reason)
        .await?;
    Ok(ApiResponse::success(tenant))
}

/// Empty or whitespace-only bodies mean "no reason"
fn parse_reject_body(payload: &[u8]) -> Result<RejectTenant, ApiError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(RejectTenant::default());
    }
    serde_json::from_slice(payload).map_err(|e| {
        ApiError::invalid_json(format!("Failed to parse the request body as JSON: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_means_no_reason() {
        assert_eq!(parse_reject_body(b"").unwrap().reason, None);
        assert_eq!(parse_reject_body(b" \n").unwrap().reason, None);
        assert_eq!(parse_reject_body(b"{}").unwrap().reason, None);
    }

    #[test]
    fn reason_is_read_from_json() {
        let body = parse_reject_body(br#"{"reason":"Missing VAT number"}"#).unwrap();
        assert_eq!(body.reason.as_deref(), Some("Missing VAT number"));
    }

    #[test]
    fn malformed_body_is_invalid_json() {
        assert!(matches!(parse_reject_body(b"{reason"), Err(ApiError::InvalidJson(_))));
    }
}
