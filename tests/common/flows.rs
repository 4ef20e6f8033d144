use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use tokio::sync::OnceCell;

use super::{request, send, unique};
use tiered_pricing_api::database::DatabaseManager;
use tiered_pricing_api::services::UserService;

pub const PASSWORD: &str = "Passw0rd-for-tests";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Migrate once per test binary and create a fresh super admin; returns its token
pub async fn bootstrap_super_admin() -> String {
    MIGRATED
        .get_or_init(|| async {
            DatabaseManager::migrate().await.expect("migrations apply");
        })
        .await;

    let email = format!("{}@admin.test", unique("root"));
    UserService::connect()
        .await
        .expect("pool")
        .create_super_admin(&email, PASSWORD, "Root Admin")
        .await
        .expect("super admin created");

    login(&email).await
}

pub async fn login(email: &str) -> String {
    let (status, body) = try_login(email).await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().expect("token").to_string()
}

pub async fn try_login(email: &str) -> (StatusCode, Value) {
    send(request(
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    ))
    .await
}

/// Register a tenant; returns (tenant id, admin email)
pub async fn register(tenant_type: &str) -> (Uuid, String) {
    let email = format!("{}@{}.test", unique("admin"), tenant_type);
    let (status, body) = send(request(
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "tenant_name": unique(tenant_type),
            "tenant_type": tenant_type,
            "name": "Tenant Admin",
            "email": email,
            "password": PASSWORD
        })),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    assert_eq!(body["data"]["tenant"]["status"], "pending");

    let id = body["data"]["tenant"]["id"].as_str().expect("tenant id");
    (Uuid::parse_str(id).expect("uuid"), email)
}

pub async fn reject(admin_token: &str, tenant_id: Uuid) -> Value {
    let uri = format!("/api/v1/admin/tenants/{}/reject", tenant_id);
    let (status, body) = send(request(Method::POST, &uri, Some(admin_token), None)).await;
    assert_eq!(status, StatusCode::OK, "reject failed: {body}");
    body
}

pub async fn approve(admin_token: &str, tenant_id: Uuid) -> Value {
    let uri = format!("/api/v1/admin/tenants/{}/approve", tenant_id);
    let (status, body) = send(request(Method::POST, &uri, Some(admin_token), None)).await;
    assert_eq!(status, StatusCode::OK, "approve failed: {body}");
    body
}

/// Register, approve and log in; returns (tenant id, admin token)
pub async fn active_tenant(admin_token: &str, tenant_type: &str) -> (Uuid, String) {
    let (tenant_id, email) = register(tenant_type).await;
    approve(admin_token, tenant_id).await;
    (tenant_id, login(&email).await)
}

/// Add a user with `role` to the tenant of `admin_token`; returns its token
pub async fn tenant_user(admin_token: &str, role: &str) -> String {
    let email = format!("{}@{}.test", unique("staff"), role);
    let (status, body) = send(request(
        Method::POST,
        "/api/v1/users",
        Some(admin_token),
        Some(json!({ "email": email, "password": PASSWORD, "name": "Staff Member", "role": role })),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED, "user create failed: {body}");
    login(&email).await
}

/// Create a product as `supplier_token`; returns its id
pub async fn product(supplier_token: &str, name: &str) -> String {
    let (status, body) = send(request(
        Method::POST,
        "/api/v1/products",
        Some(supplier_token),
        Some(json!({ "sku": unique("SKU"), "name": name, "description": "Test product" })),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED, "product create failed: {body}");
    body["data"]["id"].as_str().expect("product id").to_string()
}
