//! Integration tests for the RFQ workflow: drafting, emailing the vendor a
//! document snapshot, and recording the quotes that come back.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn create_rfq(app: &TestApp, vendor_id: Uuid, product_id: Uuid) -> Value {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/rfqs",
            Some(json!({
                "vendor_id": vendor_id.to_string(),
                "expiry_date": "2026-09-30",
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 2, "estimated_unit_price": "12.50"},
                ],
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await
}

#[tokio::test]
async fn create_rfq_with_expiry_and_sequential_id() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Quote Me Inc", "rfq@quoteme.example").await;
    let product_id = app.seed_product("Pro Widget", vendor_id).await;

    let created = create_rfq(&app, vendor_id, product_id).await;
    assert_eq!(created["data"]["id"], "RFQ000001");
    assert_eq!(created["data"]["status"], "awaiting");
    assert_eq!(created["data"]["expiry_date"], "2026-09-30");
    assert_eq!(created["data"]["vendor_id"], vendor_id.to_string().as_str());
    assert_eq!(created["data"]["total"], "25.00");
}

#[tokio::test]
async fn malformed_expiry_dates_are_rejected() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Date Vendor", "dates@vendor.example").await;
    let product_id = app.seed_product("Calendar", vendor_id).await;

    for expiry in ["next tuesday", "2026-02-30", "30/09/2026"] {
        let response = app
            .request_authenticated(
                Method::POST,
                "/api/v1/rfqs",
                Some(json!({
                    "vendor_id": vendor_id.to_string(),
                    "expiry_date": expiry,
                    "items": [
                        {"product_id": product_id.to_string(), "quantity": 1, "estimated_unit_price": "1.00"},
                    ],
                })),
            )
            .await;
        assert_eq!(response.status(), 400, "expiry {:?} should be rejected", expiry);
    }
}

#[tokio::test]
async fn sending_an_rfq_emails_the_vendor_a_snapshot() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Snapshot Supply", "quotes@snapshot.example").await;
    let product_id = app.seed_product("Pro Widget", vendor_id).await;
    let created = create_rfq(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("rfq id").to_string();

    let send = app
        .request_authenticated(Method::POST, &format!("/api/v1/rfqs/{}/send", id), None)
        .await;
    assert_eq!(send.status(), 200);
    let body = response_json(send).await;
    assert_eq!(body["data"]["vendor_email"], "quotes@snapshot.example");

    let email = app
        .mailer
        .sent()
        .into_iter()
        .find(|mail| mail.subject == format!("Request for Quotation: {}", id))
        .expect("rfq email captured");
    assert_eq!(email.to, vec!["quotes@snapshot.example".to_string()]);
    assert!(email.body.contains("Pro Widget"));
    assert!(email.body.contains("25.00"));
}

#[tokio::test]
async fn record_and_fetch_vendor_quotes() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Primary Vendor", "primary@vendor.example").await;
    let rival_id = app.seed_vendor("Rival Vendor", "rival@vendor.example").await;
    let product_id = app.seed_product("Pro Widget", vendor_id).await;
    let created = create_rfq(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("rfq id").to_string();

    let record = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/rfqs/{}/quotes", id),
            Some(json!({
                "vendor_id": rival_id.to_string(),
                "items": [
                    {"product_id": product_id.to_string(), "quantity": 2, "estimated_unit_price": "11.00"},
                ],
            })),
        )
        .await;
    assert_eq!(record.status(), 201);
    let quote = response_json(record).await;
    assert_eq!(quote["data"]["rfq_id"], id.as_str());
    assert_eq!(quote["data"]["vendor_id"], rival_id.to_string().as_str());
    assert_eq!(quote["data"]["total"], "22.00");
    let quote_id = quote["data"]["id"].as_str().expect("quote id").to_string();

    let listed = response_json(
        app.request(Method::GET, &format!("/api/v1/rfqs/{}/quotes", id), None, None)
            .await,
    )
    .await;
    let quotes = listed["data"].as_array().expect("quote rows");
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0]["id"], quote_id.as_str());

    let fetched = app
        .request(
            Method::GET,
            &format!("/api/v1/rfqs/quotes/{}", quote_id),
            None,
            None,
        )
        .await;
    assert_eq!(fetched.status(), 200);

    let missing = app
        .request(
            Method::GET,
            &format!("/api/v1/rfqs/quotes/{}", Uuid::new_v4()),
            None,
            None,
        )
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn quotes_for_an_unknown_rfq_are_a_404() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/rfqs/RFQ999999/quotes", None, None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn update_selects_the_rfq() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Select Vendor", "select@vendor.example").await;
    let product_id = app.seed_product("Selected Widget", vendor_id).await;
    let created = create_rfq(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("rfq id").to_string();

    let select = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/rfqs/{}", id),
            Some(json!({"status": "selected"})),
        )
        .await;
    assert_eq!(select.status(), 200);
    assert_eq!(response_json(select).await["data"]["status"], "selected");

    let bogus = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/rfqs/{}", id),
            Some(json!({"status": "shipped"})),
        )
        .await;
    assert_eq!(bogus.status(), 400);
}

#[tokio::test]
async fn hiding_an_rfq_is_a_reversible_toggle() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Hide RFQ Vendor", "hiderfq@vendor.example").await;
    let product_id = app.seed_product("Hidden Widget", vendor_id).await;
    let created = create_rfq(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("rfq id").to_string();

    let hide = app
        .request_authenticated(Method::POST, &format!("/api/v1/rfqs/{}/hide", id), None)
        .await;
    assert_eq!(response_json(hide).await["data"]["is_hidden"], true);

    let listed = response_json(app.request(Method::GET, "/api/v1/rfqs", None, None).await).await;
    assert_eq!(listed["data"]["pagination"]["total"], 0);

    let unhide = app
        .request_authenticated(Method::POST, &format!("/api/v1/rfqs/{}/hide", id), None)
        .await;
    assert_eq!(response_json(unhide).await["data"]["is_hidden"], false);
}

#[tokio::test]
async fn sending_requires_a_token() {
    let app = TestApp::new().await;
    let vendor_id = app.seed_vendor("Token Vendor", "token@vendor.example").await;
    let product_id = app.seed_product("Token Widget", vendor_id).await;
    let created = create_rfq(&app, vendor_id, product_id).await;
    let id = created["data"]["id"].as_str().expect("rfq id").to_string();

    let response = app
        .request(Method::POST, &format!("/api/v1/rfqs/{}/send", id), None, None)
        .await;
    assert_eq!(response.status(), 401);
}
