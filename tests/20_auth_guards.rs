mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use serde_json::json;
use uuid::Uuid;

use common::{expired_token, get, request, send, token_for, token_for_tenant};
use tiered_pricing_api::types::{Role, TenantType};

#[tokio::test]
async fn me_requires_a_token() {
    let (status, body) = send(get("/api/v1/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "Missing Authorization header");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let req = Request::builder()
        .uri("/api/v1/auth/me")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (status, body) = send(get("/api/v1/admin/tenants", Some("not.a.jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let token = expired_token(Role::SuperAdmin);
    let (status, body) = send(get("/api/v1/admin/tenants/pending", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token has expired");
}

#[tokio::test]
async fn tenant_routes_require_a_token() {
    for uri in ["/api/v1/products", "/api/v1/catalog", "/api/v1/users", "/api/v1/companies"] {
        let (status, _) = send(get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn admin_routes_refuse_tenant_roles() {
    let supplier = token_for_tenant(Role::SupplierAdmin, TenantType::Supplier);
    let company = token_for_tenant(Role::CompanyUser, TenantType::Company);
    let tenant_id = Uuid::new_v4();

    for token in [&supplier, &company] {
        let (status, body) = send(get("/api/v1/admin/tenants/pending", Some(token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");

        let uri = format!("/api/v1/admin/tenants/{}/approve", tenant_id);
        let (status, _) = send(request(Method::POST, &uri, Some(token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let uri = format!("/api/v1/admin/tenants/{}/reject", tenant_id);
        let (status, _) = send(request(Method::POST, &uri, Some(token), Some(json!({ "reason": "no" })))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn tenant_routes_refuse_users_without_tenant() {
    let super_admin = token_for(Role::SuperAdmin, None);
    for uri in ["/api/v1/products", "/api/v1/catalog", "/api/v1/users"] {
        let (status, body) = send(get(uri, Some(&super_admin))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "This endpoint requires a tenant account");
    }
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    use tiered_pricing_api::auth::{generate_jwt_with, Claims};
    use tiered_pricing_api::config::config;

    let mut security = config().security.clone();
    security.jwt_secret = "some-other-secret".into();
    let claims = Claims::new(
        Uuid::new_v4(),
        "root@example.test".into(),
        Role::SuperAdmin,
        None,
        None,
        &security,
    );
    let token = generate_jwt_with(&claims, &security).unwrap().token;

    let (status, _) = send(get("/api/v1/admin/tenants", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
