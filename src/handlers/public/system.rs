// handlers/public/system.rs - GET / and GET /health

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::database::DatabaseManager;

/// GET / - service info and route map
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Tiered Pricing API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Multi-tenant B2B pricing with tenant approval and tiered prices",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/v1/auth/register, /api/v1/auth/login (public), /api/v1/auth/me (authenticated)",
                "admin": "/api/v1/admin/tenants[/:id[/approve|/reject]] (super admin)",
                "users": "/api/v1/users (tenant admins)",
                "companies": "/api/v1/companies (suppliers)",
                "products": "/api/v1/products[/:id[/prices/*]] (suppliers)",
                "catalog": "/api/v1/catalog[/:product_id/quote] (companies)",
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
