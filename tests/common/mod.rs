#![allow(dead_code)]

pub mod flows;

use std::future::Future;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::runtime::Runtime;
use tower::ServiceExt;
use uuid::Uuid;

use tiered_pricing_api::auth::{generate_jwt, Claims};
use tiered_pricing_api::config::config;
use tiered_pricing_api::types::{Role, TenantType};

pub fn router() -> Router {
    tiered_pricing_api::app()
}

/// Runtime shared by every DB-backed test in a binary. The database pool is
/// process-wide and its connections belong to the runtime that opened them.
static DB_RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("build test runtime")
});

/// DB-backed tests only run when a database is configured
pub fn database_configured() -> bool {
    std::env::var("DATABASE_URL").map(|v| !v.is_empty()).unwrap_or(false)
}

/// Run a DB-backed test body on the shared runtime; skipped without DATABASE_URL
pub fn with_database<F, Fut>(name: &str, test: F)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    if !database_configured() {
        eprintln!("DATABASE_URL not set; skipping {}", name);
        return;
    }
    DB_RUNTIME.block_on(test());
}

/// Signed token for an arbitrary identity; nothing is written to the database
pub fn token_for(role: Role, tenant_id: Option<Uuid>) -> String {
    let claims = Claims::new(
        Uuid::new_v4(),
        format!("{}@example.test", role),
        role,
        tenant_id,
        role.tenant_type(),
        &config().security,
    );
    generate_jwt(&claims).expect("sign token").token
}

pub fn token_for_tenant(role: Role, tenant_type: TenantType) -> String {
    assert_eq!(role.tenant_type(), Some(tenant_type));
    token_for(role, Some(Uuid::new_v4()))
}

pub fn expired_token(role: Role) -> String {
    let mut claims = Claims::new(
        Uuid::new_v4(),
        "expired@example.test".into(),
        role,
        None,
        None,
        &config().security,
    );
    claims.iat = (Utc::now() - Duration::hours(3)).timestamp();
    claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
    generate_jwt(&claims).expect("sign token").token
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, token, None)
}

/// Run one request through a fresh router; empty bodies come back as `Null`
pub async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let response = router().oneshot(req).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}
