//! Integration tests for the product catalog.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn create_product_with_full_references() {
    let app = TestApp::new().await;

    let vendor_id = app.seed_vendor("Office Depot", "orders@officedepot.example").await;
    let unit = response_json(
        app.request_authenticated(Method::POST, "/api/v1/units", Some(json!({"name": "Ream"})))
            .await,
    )
    .await;
    let unit_id = unit["data"]["id"].as_str().expect("unit id").to_string();
    let category = response_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/product-categories",
            Some(json!({"name": "Office Supplies"})),
        )
        .await,
    )
    .await;
    let category_id = category["data"]["id"].as_str().expect("category id").to_string();

    let create = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "A4 Copy Paper",
                "product_type": "consumable",
                "unit_id": unit_id,
                "category_id": category_id,
                "vendor_id": vendor_id.to_string(),
                "cost_price": "4.20",
                "selling_price": "6.90",
            })),
        )
        .await;
    assert_eq!(create.status(), 201);
    let created = response_json(create).await;
    assert_eq!(created["data"]["name"], "A4 Copy Paper");
    assert_eq!(created["data"]["product_type"], "consumable");
    assert_eq!(created["data"]["cost_price"], "4.20");
    assert_eq!(created["data"]["selling_price"], "6.90");
    let id = created["data"]["id"].as_str().expect("product id").to_string();

    let fetched = response_json(
        app.request(Method::GET, &format!("/api/v1/products/{}", id), None, None)
            .await,
    )
    .await;
    assert_eq!(fetched["data"]["unit_id"], unit_id.as_str());
    assert_eq!(fetched["data"]["category_id"], category_id.as_str());
    assert_eq!(fetched["data"]["vendor_id"], vendor_id.to_string().as_str());
}

#[tokio::test]
async fn product_requires_an_existing_vendor() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Orphan Product",
                "product_type": "storeable",
                "vendor_id": Uuid::new_v4().to_string(),
                "cost_price": "1.00",
                "selling_price": "2.00",
            })),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn unknown_product_type_is_rejected() {
    let app = TestApp::new().await;

    let vendor_id = app.seed_vendor("Type Test Vendor", "types@vendor.example").await;
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Mystery Item",
                "product_type": "perishable",
                "vendor_id": vendor_id.to_string(),
                "cost_price": "1.00",
                "selling_price": "2.00",
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn product_prices_must_be_whole_cents() {
    let app = TestApp::new().await;

    let vendor_id = app.seed_vendor("Pricing Vendor", "pricing@vendor.example").await;
    for (cost, selling, bad_field) in [
        ("-1.00", "2.00", "cost_price"),
        ("1.00", "2.005", "selling_price"),
    ] {
        let response = app
            .request_authenticated(
                Method::POST,
                "/api/v1/products",
                Some(json!({
                    "name": "Badly Priced Item",
                    "product_type": "consumable",
                    "vendor_id": vendor_id.to_string(),
                    "cost_price": cost,
                    "selling_price": selling,
                })),
            )
            .await;
        assert_eq!(response.status(), 400, "prices {cost}/{selling}");

        // The error details name the offending field
        let body = response_json(response).await;
        let details = body["details"].as_str().unwrap_or_default().to_string();
        assert!(
            details.contains(bad_field),
            "details should mention {bad_field}: {details}"
        );
    }

    let list = response_json(app.request(Method::GET, "/api/v1/products", None, None).await).await;
    assert_eq!(list["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn update_product_reprices_and_retypes() {
    let app = TestApp::new().await;

    let vendor_id = app.seed_vendor("Reprice Vendor", "reprice@vendor.example").await;
    let product_id = app.seed_product("Label Printer", vendor_id).await;

    let update = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/products/{}", product_id),
            Some(json!({
                "product_type": "storeable",
                "selling_price": "24.50",
            })),
        )
        .await;
    assert_eq!(update.status(), 200);
    let updated = response_json(update).await;
    assert_eq!(updated["data"]["product_type"], "storeable");
    assert_eq!(updated["data"]["selling_price"], "24.50");
    assert_eq!(updated["data"]["cost_price"], "10.00");
}

#[tokio::test]
async fn hidden_products_stay_out_of_default_listing() {
    let app = TestApp::new().await;

    let vendor_id = app.seed_vendor("Hide Vendor", "hide@vendor.example").await;
    let keep = app.seed_product("Visible Product", vendor_id).await;
    let hide = app.seed_product("Retired Product", vendor_id).await;

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/products/{}/hide", hide),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let listed = response_json(app.request(Method::GET, "/api/v1/products", None, None).await).await;
    assert_eq!(listed["data"]["pagination"]["total"], 1);
    assert_eq!(listed["data"]["data"][0]["id"], keep.to_string().as_str());
}

#[tokio::test]
async fn product_writes_require_a_token() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "No Token Product",
                "product_type": "consumable",
                "vendor_id": Uuid::new_v4().to_string(),
                "cost_price": "1.00",
                "selling_price": "2.00",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);
}
