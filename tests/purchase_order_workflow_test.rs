//! Integration tests for the purchase order flow: drafting against a vendor,
//! emailing the order out, moving the status forward and recording quotes.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn create_order(app: &TestApp, vendor_id: Uuid, product_id: Uuid) -> Value {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "vendor_id": vendor_id.to_string(),
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 4, "estimated_unit_price": "7.25"},
                ],
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await
}

#[tokio::test]
async fn create_purchase_order_with_sequential_id() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Order Vendor", "orders@vendor.example").await;
    let product_id = app.seed_product("Conveyor Belt", vendor_id).await;

    let first = create_order(&app, vendor_id, product_id).await;
    assert_eq!(first["data"]["id"], "PO000001");
    assert_eq!(first["data"]["status"], "draft");
    assert_eq!(first["data"]["total"], "29.00");

    let second = create_order(&app, vendor_id, product_id).await;
    assert_eq!(second["data"]["id"], "PO000002");
}

#[tokio::test]
async fn order_numbering_is_independent_of_other_document_kinds() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Mixed Vendor", "mixed@vendor.example").await;
    let product_id = app.seed_product("Mixed Widget", vendor_id).await;

    let rfq = app
        .request_authenticated(
            Method::POST,
            "/api/v1/rfqs",
            Some(json!({
                "vendor_id": vendor_id.to_string(),
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 1, "estimated_unit_price": "3.00"},
                ],
            })),
        )
        .await;
    assert_eq!(response_json(rfq).await["data"]["id"], "RFQ000001");

    let order = create_order(&app, vendor_id, product_id).await;
    assert_eq!(order["data"]["id"], "PO000001");
}

#[tokio::test]
async fn sending_a_purchase_order_emails_the_vendor() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Dispatch Vendor", "po@dispatch.example").await;
    let product_id = app.seed_product("Conveyor Belt", vendor_id).await;
    let created = create_order(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("order id").to_string();

    let send = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/send", id),
            None,
        )
        .await;
    assert_eq!(send.status(), 200);
    let body = response_json(send).await;
    assert_eq!(body["data"]["vendor_email"], "po@dispatch.example");
    assert_eq!(body["data"]["message"], "Purchase order sent to vendor");

    let email = app
        .mailer
        .sent()
        .into_iter()
        .find(|mail| mail.subject == format!("Purchase Order: {}", id))
        .expect("purchase order email captured");
    assert_eq!(email.to, vec!["po@dispatch.example".to_string()]);
    assert!(email.body.contains("Conveyor Belt"));
    assert!(email.body.contains("29.00"));
}

#[tokio::test]
async fn status_moves_through_awaiting_to_completed() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Lifecycle Vendor", "lifecycle@vendor.example").await;
    let product_id = app.seed_product("Lifecycle Widget", vendor_id).await;
    let created = create_order(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("order id").to_string();

    for status in ["awaiting", "completed"] {
        let update = app
            .request_authenticated(
                Method::PUT,
                &format!("/api/v1/purchase-orders/{}", id),
                Some(json!({"status": status})),
            )
            .await;
        assert_eq!(update.status(), 200);
        assert_eq!(response_json(update).await["data"]["status"], status);
    }

    let bogus = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{}", id),
            Some(json!({"status": "delivered"})),
        )
        .await;
    assert_eq!(bogus.status(), 400);
}

#[tokio::test]
async fn replacing_items_recomputes_the_order_total() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Retotal Vendor", "retotal@vendor.example").await;
    let product_id = app.seed_product("Retotal Widget", vendor_id).await;
    let created = create_order(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("order id").to_string();

    let replace = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/purchase-orders/{}/items", id),
            Some(json!({
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 10, "estimated_unit_price": "1.10"},
                    {"product_id": product_id.to_string(), "quantity": 1, "estimated_unit_price": "0.90"},
                ],
            })),
        )
        .await;
    assert_eq!(replace.status(), 200);
    let replaced = response_json(replace).await;
    assert_eq!(replaced["data"]["total"], "11.90");
    assert_eq!(replaced["data"]["items"].as_array().expect("item rows").len(), 2);
}

#[tokio::test]
async fn vendor_quotes_attach_to_the_order() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Quoted Vendor", "quoted@vendor.example").await;
    let product_id = app.seed_product("Quoted Widget", vendor_id).await;
    let created = create_order(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("order id").to_string();

    let record = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/quotes", id),
            Some(json!({
                "vendor_id": vendor_id.to_string(),
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 4, "estimated_unit_price": "6.80"},
                ],
            })),
        )
        .await;
    assert_eq!(record.status(), 201);
    let quote = response_json(record).await;
    assert_eq!(quote["data"]["purchase_order_id"], id.as_str());
    assert_eq!(quote["data"]["total"], "27.20");
    let quote_id = quote["data"]["id"].as_str().expect("quote id").to_string();

    let listed = response_json(
        app.request(
            Method::GET,
            &format!("/api/v1/purchase-orders/{}/quotes", id),
            None,
            None,
        )
        .await,
    )
    .await;
    assert_eq!(listed["data"].as_array().expect("quote rows").len(), 1);

    let fetched = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders/quotes/{}", quote_id),
            None,
            None,
        )
        .await;
    assert_eq!(fetched.status(), 200);
}

#[tokio::test]
async fn unknown_order_is_a_404_for_send_and_get() {
    let app = TestApp::new().await;

    let get = app
        .request(Method::GET, "/api/v1/purchase-orders/PO424242", None, None)
        .await;
    assert_eq!(get.status(), 404);

    let send = app
        .request_authenticated(Method::POST, "/api/v1/purchase-orders/PO424242/send", None)
        .await;
    assert_eq!(send.status(), 404);
}
