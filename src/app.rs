use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, SecurityConfig};
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_active_tenant, require_super_admin};

/// Full application router
pub fn app() -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Authenticated
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(tenant_routes())
        .fallback(not_found);

    let router = match cors_layer(&config::config().security) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    if config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn auth_public_routes() -> Router {
    use public::auth;

    Router::new()
        .route("/api/v1/auth/register", post(auth::register_post))
        .route("/api/v1/auth/login", post(auth::login_post))
}

fn auth_routes() -> Router {
    use protected::auth;

    Router::new()
        .route("/api/v1/auth/me", get(auth::me_get))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn admin_routes() -> Router {
    use elevated::tenants;

    // route_layer order: the last layer added runs first
    Router::new()
        .route("/api/v1/admin/tenants", get(tenants::tenants_list))
        .route("/api/v1/admin/tenants/pending", get(tenants::tenants_pending))
        .route("/api/v1/admin/tenants/:id", get(tenants::tenant_show))
        .route("/api/v1/admin/tenants/:id/approve", post(tenants::tenant_approve))
        .route("/api/v1/admin/tenants/:id/reject", post(tenants::tenant_reject))
        .route_layer(from_fn(require_super_admin))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn tenant_routes() -> Router {
    use protected::{catalog, companies, products, users};

    Router::new()
        .route("/api/v1/users", get(users::users_list).post(users::user_create))
        .route("/api/v1/companies", get(companies::companies_list))
        .route(
            "/api/v1/products",
            get(products::products_list).post(products::product_create),
        )
        .route(
            "/api/v1/products/:id",
            get(products::product_get)
                .patch(products::product_patch)
                .delete(products::product_delete),
        )
        .route(
            "/api/v1/products/:id/prices/default",
            get(products::default_prices_get).put(products::default_prices_put),
        )
        .route("/api/v1/products/:id/prices/private", get(products::private_prices_list))
        .route(
            "/api/v1/products/:id/prices/private/:company_id",
            put(products::private_prices_put).delete(products::private_prices_delete),
        )
        .route("/api/v1/products/:id/prices/history", get(products::price_history_get))
        .route("/api/v1/products/:id/prices/views", get(products::price_views_get))
        .route("/api/v1/catalog", get(catalog::catalog_get))
        .route("/api/v1/catalog/:product_id/quote", get(catalog::quote_get))
        .route_layer(from_fn(require_active_tenant))
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// `None` when CORS is disabled; `*` in the origin list allows any origin
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
