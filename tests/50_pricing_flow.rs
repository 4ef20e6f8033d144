mod common;

use std::str::FromStr;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use common::flows::{
    active_tenant, bootstrap_super_admin, login, product, register, reject, tenant_user, PASSWORD,
};
use common::{get, request, send, unique, with_database};

fn dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        other => Decimal::from_str(&other.to_string()).expect("decimal number"),
    }
}

fn price(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn usd(unit_price: &str) -> Value {
    json!({ "currency": "USD", "tiers": [{ "min_quantity": 1, "unit_price": unit_price }] })
}

#[test]
fn supplier_prices_and_company_quotes() {
    with_database("pricing workflow", pricing_workflow);
}

async fn pricing_workflow() {
    let admin = bootstrap_super_admin().await;
    let (_, supplier) = active_tenant(&admin, "supplier").await;
    let (_, other_supplier) = active_tenant(&admin, "supplier").await;
    let (company_a, buyer_a) = active_tenant(&admin, "company").await;
    let (_, buyer_b) = active_tenant(&admin, "company").await;

    // Product
    let sku = unique("SKU");
    let (status, body) = send(request(
        Method::POST,
        "/api/v1/products",
        Some(&supplier),
        Some(json!({ "sku": sku, "name": "Copper wire", "unit": "roll" })),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let product_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(request(
        Method::POST,
        "/api/v1/products",
        Some(&supplier),
        Some(json!({ "sku": sku, "name": "Duplicate" })),
    ))
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(get(&format!("/api/v1/products/{}", product_id), Some(&other_supplier))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Companies cannot manage products
    let (status, _) = send(get("/api/v1/products", Some(&buyer_a))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unpriced products cannot be quoted
    let quote_uri = format!("/api/v1/catalog/{}/quote?quantity=12", product_id);
    let (status, _) = send(get(&quote_uri, Some(&buyer_a))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Default tiers
    let default_uri = format!("/api/v1/products/{}/prices/default", product_id);
    let (status, body) = send(request(
        Method::PUT,
        &default_uri,
        Some(&supplier),
        Some(json!({ "currency": "USD", "tiers": [{ "min_quantity": 5, "unit_price": "9.00" }] })),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["tiers"].is_string());

    let (status, body) = send(request(
        Method::PUT,
        &default_uri,
        Some(&supplier),
        Some(json!({
            "currency": "usd",
            "tiers": [
                { "min_quantity": 10, "unit_price": "9.00" },
                { "min_quantity": 1, "unit_price": "10.00" }
            ]
        })),
    ))
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["currency"], "USD");
    assert_eq!(body["data"]["tiers"][0]["min_quantity"], 1);

    let (status, body) = send(get(&quote_uri, Some(&buyer_a))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["price_type"], "default");
    assert_eq!(body["data"]["min_quantity"], 10);
    assert_eq!(dec(&body["data"]["unit_price"]), price("9.00"));
    assert_eq!(dec(&body["data"]["total"]), price("108.00"));

    // Private tiers for company A only
    let private_uri = format!("/api/v1/products/{}/prices/private/{}", product_id, company_a);
    let (status, body) = send(request(
        Method::PUT,
        &private_uri,
        Some(&supplier),
        Some(json!({ "currency": "USD", "tiers": [{ "min_quantity": 1, "unit_price": "8.50" }] })),
    ))
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = send(get(&quote_uri, Some(&buyer_a))).await;
    assert_eq!(body["data"]["price_type"], "private");
    assert_eq!(dec(&body["data"]["unit_price"]), price("8.50"));
    assert_eq!(dec(&body["data"]["total"]), price("102.00"));

    let (_, body) = send(get(&quote_uri, Some(&buyer_b))).await;
    assert_eq!(body["data"]["price_type"], "default");

    let list_uri = format!("/api/v1/products/{}/prices/private", product_id);
    let (status, body) = send(get(&list_uri, Some(&supplier))).await;
    assert_eq!(status, StatusCode::OK);
    let lists = body["data"].as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["company_id"], company_a.to_string());

    // Catalog shows the effective tier list
    let (status, body) = send(get(&format!("/api/v1/catalog?q={}", sku), Some(&buyer_a))).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["price_type"], "private");
    assert_eq!(items[0]["sku"], sku);

    // Invalid quantity
    let (status, _) = send(get(&format!("/api/v1/catalog/{}/quote?quantity=0", product_id), Some(&buyer_a))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Supplier users read but do not write
    let user_email = format!("{}@supplier.test", unique("staff"));
    let (status, body) = send(request(
        Method::POST,
        "/api/v1/users",
        Some(&supplier),
        Some(json!({ "email": user_email, "password": PASSWORD, "name": "Staff", "role": "supplier_user" })),
    ))
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let staff = login(&user_email).await;

    let (status, _) = send(get(&default_uri, Some(&staff))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(request(
        Method::PUT,
        &default_uri,
        Some(&staff),
        Some(json!({ "currency": "USD", "tiers": [{ "min_quantity": 1, "unit_price": "1.00" }] })),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Company roles are not assignable in a supplier tenant
    let (status, _) = send(request(
        Method::POST,
        "/api/v1/users",
        Some(&supplier),
        Some(json!({ "email": format!("{}@x.test", unique("u")), "password": PASSWORD, "name": "X", "role": "company_user" })),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Audit trail and views
    let (status, body) = send(get(&format!("/api/v1/products/{}/prices/history", product_id), Some(&supplier))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"][0]["action"], "set_private");
    assert_eq!(body["data"]["items"][1]["action"], "set_default");

    let (status, body) = send(get(&format!("/api/v1/products/{}/prices/views", product_id), Some(&supplier))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);

    // Removing private tiers falls back to defaults
    let (status, _) = send(request(Method::DELETE, &private_uri, Some(&supplier), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(request(Method::DELETE, &private_uri, Some(&supplier), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(get(&quote_uri, Some(&buyer_a))).await;
    assert_eq!(body["data"]["price_type"], "default");

    // Deactivated products leave the catalog
    let (status, body) = send(request(
        Method::DELETE,
        &format!("/api/v1/products/{}", product_id),
        Some(&supplier),
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (status, _) = send(get(&quote_uri, Some(&buyer_a))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn private_prices_need_an_active_company() {
    with_database("private price targets", || async {
        let admin = bootstrap_super_admin().await;
        let (other_supplier_id, supplier) = active_tenant(&admin, "supplier").await;
        let product_id = product(&supplier, "Steel bolts").await;

        let (pending_id, _) = register("company").await;
        let (rejected_id, _) = register("company").await;
        reject(&admin, rejected_id).await;

        for target in [pending_id, rejected_id, other_supplier_id, uuid::Uuid::new_v4()] {
            let uri = format!("/api/v1/products/{}/prices/private/{}", product_id, target);
            let (status, body) = send(request(Method::PUT, &uri, Some(&supplier), Some(usd("2.00")))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "target {target}: {body}");
            assert_eq!(body["error"], "Private prices can only be set for active company tenants");
        }

        let uri = format!("/api/v1/products/{}/prices/private", product_id);
        let (_, body) = send(get(&uri, Some(&supplier))).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    });
}

#[test]
fn unpriced_products_have_null_prices_in_catalog() {
    with_database("unpriced catalog entries", || async {
        let admin = bootstrap_super_admin().await;
        let (_, supplier) = active_tenant(&admin, "supplier").await;
        let (_, buyer) = active_tenant(&admin, "company").await;
        let name = unique("Unpriced-gasket");
        let product_id = product(&supplier, &name).await;

        let (status, body) = send(get(&format!("/api/v1/catalog?q={}", name), Some(&buyer))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], product_id.as_str());
        assert!(items[0]["price_type"].is_null());
        assert!(items[0]["prices"].is_null());
    });
}

#[test]
fn companies_listing_shows_only_active_companies() {
    with_database("companies listing", || async {
        let admin = bootstrap_super_admin().await;
        let (_, supplier) = active_tenant(&admin, "supplier").await;
        let (active_id, buyer) = active_tenant(&admin, "company").await;
        let (pending_id, _) = register("company").await;

        let (status, body) = send(get("/api/v1/companies?limit=100", Some(&supplier))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let items = body["data"]["items"].as_array().unwrap();
        assert!(items
            .iter()
            .all(|t| t["status"] == "active" && t["tenant_type"] == "company"));
        assert!(items.iter().any(|t| t["id"] == active_id.to_string()));
        assert!(!items.iter().any(|t| t["id"] == pending_id.to_string()));

        let (status, _) = send(get("/api/v1/companies", Some(&buyer))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    });
}

#[test]
fn supplier_users_cannot_change_products() {
    with_database("supplier user product writes", || async {
        let admin = bootstrap_super_admin().await;
        let (_, supplier) = active_tenant(&admin, "supplier").await;
        let staff = tenant_user(&supplier, "supplier_user").await;
        let product_id = product(&supplier, "Cable ties").await;
        let uri = format!("/api/v1/products/{}", product_id);

        let (status, _) = send(request(
            Method::POST,
            "/api/v1/products",
            Some(&staff),
            Some(json!({ "sku": unique("SKU"), "name": "Not allowed" })),
        ))
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(request(Method::PATCH, &uri, Some(&staff), Some(json!({ "name": "Renamed" })))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(request(Method::DELETE, &uri, Some(&staff), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(get(&uri, Some(&staff))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Cable ties");
        assert_eq!(body["data"]["is_active"], true);
    });
}

#[test]
fn unit_prices_beyond_storage_are_field_errors() {
    with_database("oversized unit price", || async {
        let admin = bootstrap_super_admin().await;
        let (_, supplier) = active_tenant(&admin, "supplier").await;
        let product_id = product(&supplier, "Gold ingot").await;
        let uri = format!("/api/v1/products/{}/prices/default", product_id);

        let (status, body) = send(request(Method::PUT, &uri, Some(&supplier), Some(usd("100000000000")))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(body["field_errors"]["tiers"].is_string());

        let (status, body) = send(request(Method::PUT, &uri, Some(&supplier), Some(usd("9999999999.9999")))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    });
}

#[test]
fn product_description_can_be_cleared() {
    with_database("clear product description", || async {
        let admin = bootstrap_super_admin().await;
        let (_, supplier) = active_tenant(&admin, "supplier").await;
        let product_id = product(&supplier, "Hex nuts").await;
        let uri = format!("/api/v1/products/{}", product_id);

        let (status, body) = send(request(Method::PATCH, &uri, Some(&supplier), Some(json!({ "unit": "box" })))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["description"], "Test product");
        assert_eq!(body["data"]["unit"], "box");

        let (status, body) =
            send(request(Method::PATCH, &uri, Some(&supplier), Some(json!({ "description": null })))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert!(body["data"]["description"].is_null());
        assert_eq!(body["data"]["unit"], "box");
    });
}
