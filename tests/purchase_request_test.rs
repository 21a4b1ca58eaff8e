//! Integration tests for the purchase request document flow: sequential
//! display numbers, derived totals, item replacement and status moves.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn create_request(app: &TestApp, product_id: Uuid) -> Value {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/purchase-requests",
            Some(json!({
                "requester_id": app.user.id.to_string(),
                "purpose": "Restock the assembly line",
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 3, "estimated_unit_price": "10.00"},
                    {"product_id": product_id.to_string(), "quantity": 2, "estimated_unit_price": "5.00"},
                ],
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await
}

#[tokio::test]
async fn create_assigns_sequential_display_ids_and_derives_the_total() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Assembly Supply", "sales@assembly.example").await;
    let product_id = app.seed_product("Hex Bolts", vendor_id).await;

    let first = create_request(&app, product_id).await;
    assert_eq!(first["data"]["id"], "PR000001");
    assert_eq!(first["data"]["status"], "draft");
    assert_eq!(first["data"]["total"], "40.00");
    let items = first["data"]["items"].as_array().expect("item rows");
    assert_eq!(items.len(), 2);
    let bolts = items
        .iter()
        .find(|item| item["quantity"] == 3)
        .expect("three-bolt line");
    assert_eq!(bolts["line_total"], "30.00");
    let spares = items
        .iter()
        .find(|item| item["quantity"] == 2)
        .expect("two-bolt line");
    assert_eq!(spares["line_total"], "10.00");

    let second = create_request(&app, product_id).await;
    assert_eq!(second["data"]["id"], "PR000002");
}

#[tokio::test]
async fn a_request_needs_at_least_one_item() {
    let app = TestApp::new().await;

    let empty_items = app
        .request_authenticated(
            Method::POST,
            "/api/v1/purchase-requests",
            Some(json!({
                "requester_id": app.user.id.to_string(),
                "items": [],
            })),
        )
        .await;
    assert_eq!(empty_items.status(), 400);
}

#[tokio::test]
async fn zero_quantity_items_are_rejected() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Qty Vendor", "qty@vendor.example").await;
    let product_id = app.seed_product("Washers", vendor_id).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/purchase-requests",
            Some(json!({
                "requester_id": app.user.id.to_string(),
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 0, "estimated_unit_price": "1.00"},
                ],
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn sub_cent_item_prices_are_rejected() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Precision Vendor", "precision@vendor.example").await;
    let product_id = app.seed_product("Shims", vendor_id).await;

    for price in ["0.999", "-2.00"] {
        let response = app
            .request_authenticated(
                Method::POST,
                "/api/v1/purchase-requests",
                Some(json!({
                    "requester_id": app.user.id.to_string(),
                    "items": [
                        {"product_id": product_id.to_string(), "quantity": 1, "estimated_unit_price": price},
                    ],
                })),
            )
            .await;
        assert_eq!(response.status(), 400, "price {price}");
    }
}

#[tokio::test]
async fn unknown_references_surface_as_404() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Ref Vendor", "refs@vendor.example").await;
    let product_id = app.seed_product("Gaskets", vendor_id).await;

    let unknown_product = app
        .request_authenticated(
            Method::POST,
            "/api/v1/purchase-requests",
            Some(json!({
                "requester_id": app.user.id.to_string(),
                "items": [
                    {"product_id": Uuid::new_v4().to_string(), "quantity": 1, "estimated_unit_price": "1.00"},
                ],
            })),
        )
        .await;
    assert_eq!(unknown_product.status(), 404);

    let unknown_department = app
        .request_authenticated(
            Method::POST,
            "/api/v1/purchase-requests",
            Some(json!({
                "requester_id": app.user.id.to_string(),
                "department_id": Uuid::new_v4().to_string(),
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 1, "estimated_unit_price": "1.00"},
                ],
            })),
        )
        .await;
    assert_eq!(unknown_department.status(), 404);
}

#[tokio::test]
async fn update_moves_status_and_rewrites_the_purpose() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Status Vendor", "status@vendor.example").await;
    let product_id = app.seed_product("Bearings", vendor_id).await;
    let created = create_request(&app, product_id).await;
    let id = created["data"]["id"].as_str().expect("request id").to_string();

    let submit = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/purchase-requests/{}", id),
            Some(json!({"status": "submitted", "purpose": "Urgent line restock"})),
        )
        .await;
    assert_eq!(submit.status(), 200);
    let submitted = response_json(submit).await;
    assert_eq!(submitted["data"]["status"], "submitted");
    assert_eq!(submitted["data"]["purpose"], "Urgent line restock");

    let approve = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/purchase-requests/{}", id),
            Some(json!({"status": "approved"})),
        )
        .await;
    assert_eq!(response_json(approve).await["data"]["status"], "approved");

    let bogus = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/purchase-requests/{}", id),
            Some(json!({"status": "finalized"})),
        )
        .await;
    assert_eq!(bogus.status(), 400);
}

#[tokio::test]
async fn replacing_items_recomputes_the_total() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Replace Vendor", "replace@vendor.example").await;
    let product_id = app.seed_product("Couplings", vendor_id).await;
    let created = create_request(&app, product_id).await;
    let id = created["data"]["id"].as_str().expect("request id").to_string();
    assert_eq!(created["data"]["total"], "40.00");

    let replace = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/purchase-requests/{}/items", id),
            Some(json!({
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 5, "estimated_unit_price": "2.50"},
                ],
            })),
        )
        .await;
    assert_eq!(replace.status(), 200);
    let replaced = response_json(replace).await;
    assert_eq!(replaced["data"]["items"].as_array().expect("item rows").len(), 1);
    assert_eq!(replaced["data"]["total"], "12.50");

    let empty = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/purchase-requests/{}/items", id),
            Some(json!({"items": []})),
        )
        .await;
    assert_eq!(empty.status(), 400);
}

#[tokio::test]
async fn listing_filters_by_status_and_respects_hiding() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("List Vendor", "list@vendor.example").await;
    let product_id = app.seed_product("Fuses", vendor_id).await;

    let first = create_request(&app, product_id).await;
    let second = create_request(&app, product_id).await;
    create_request(&app, product_id).await;

    let first_id = first["data"]["id"].as_str().expect("request id").to_string();
    let second_id = second["data"]["id"].as_str().expect("request id").to_string();

    app.request_authenticated(
        Method::PUT,
        &format!("/api/v1/purchase-requests/{}", first_id),
        Some(json!({"status": "approved"})),
    )
    .await;
    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/purchase-requests/{}/hide", second_id),
        None,
    )
    .await;

    let drafts = response_json(
        app.request(
            Method::GET,
            "/api/v1/purchase-requests?status=draft",
            None,
            None,
        )
        .await,
    )
    .await;
    assert_eq!(drafts["data"]["pagination"]["total"], 1);

    let visible = response_json(
        app.request(Method::GET, "/api/v1/purchase-requests", None, None)
            .await,
    )
    .await;
    assert_eq!(visible["data"]["pagination"]["total"], 2);

    let everything = response_json(
        app.request(
            Method::GET,
            "/api/v1/purchase-requests?include_hidden=true",
            None,
            None,
        )
        .await,
    )
    .await;
    assert_eq!(everything["data"]["pagination"]["total"], 3);

    let bad_status = app
        .request(
            Method::GET,
            "/api/v1/purchase-requests?status=bogus",
            None,
            None,
        )
        .await;
    assert_eq!(bad_status.status(), 400);
}

#[tokio::test]
async fn reads_are_public_and_writes_are_not() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Auth Vendor", "auth@vendor.example").await;
    let product_id = app.seed_product("Clamps", vendor_id).await;
    let created = create_request(&app, product_id).await;
    let id = created["data"]["id"].as_str().expect("request id").to_string();

    let anonymous_get = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-requests/{}", id),
            None,
            None,
        )
        .await;
    assert_eq!(anonymous_get.status(), 200);

    let anonymous_hide = app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-requests/{}/hide", id),
            None,
            None,
        )
        .await;
    assert_eq!(anonymous_hide.status(), 401);
}
