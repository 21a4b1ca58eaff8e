//! Integration tests for vendor management and the announcement broadcast.
//!
//! Announcements fan out over BCC so vendor addresses stay private, and
//! hidden vendors never receive them.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn create_update_and_fetch_vendor() {
    let app = TestApp::new().await;

    let create = app
        .request_authenticated(
            Method::POST,
            "/api/v1/vendors",
            Some(json!({
                "company_name": "Nordic Fasteners AB",
                "email": "sales@nordicfasteners.example",
                "phone": "+46 8 123 456",
            })),
        )
        .await;
    assert_eq!(create.status(), 201);
    let created = response_json(create).await;
    assert_eq!(created["data"]["company_name"], "Nordic Fasteners AB");
    assert_eq!(created["data"]["is_hidden"], false);
    let id = created["data"]["id"].as_str().expect("vendor id").to_string();

    let update = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/vendors/{}", id),
            Some(json!({"address": "Box 114, Stockholm"})),
        )
        .await;
    assert_eq!(update.status(), 200);

    let fetched = response_json(
        app.request(Method::GET, &format!("/api/v1/vendors/{}", id), None, None)
            .await,
    )
    .await;
    assert_eq!(fetched["data"]["email"], "sales@nordicfasteners.example");
    assert_eq!(fetched["data"]["address"], "Box 114, Stockholm");
    assert_eq!(fetched["data"]["phone"], "+46 8 123 456");
}

#[tokio::test]
async fn vendor_creation_validates_category_and_email() {
    let app = TestApp::new().await;

    let unknown_category = app
        .request_authenticated(
            Method::POST,
            "/api/v1/vendors",
            Some(json!({
                "company_name": "Ghost Supplies",
                "email": "ghost@supplies.example",
                "category_id": Uuid::new_v4().to_string(),
            })),
        )
        .await;
    assert_eq!(unknown_category.status(), 404);

    let bad_email = app
        .request_authenticated(
            Method::POST,
            "/api/v1/vendors",
            Some(json!({
                "company_name": "Typo Trading",
                "email": "not-an-email",
            })),
        )
        .await;
    assert_eq!(bad_email.status(), 400);
}

#[tokio::test]
async fn vendor_belongs_to_its_category() {
    let app = TestApp::new().await;

    let category = response_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/vendor-categories",
            Some(json!({"name": "Freight"})),
        )
        .await,
    )
    .await;
    let category_id = category["data"]["id"].as_str().expect("category id").to_string();

    let vendor = response_json(
        app.request_authenticated(
            Method::POST,
            "/api/v1/vendors",
            Some(json!({
                "company_name": "Harbor Freight Lines",
                "email": "ops@harborfreight.example",
                "category_id": category_id,
            })),
        )
        .await,
    )
    .await;
    assert_eq!(vendor["data"]["category_id"], category_id.as_str());
}

#[tokio::test]
async fn hidden_vendors_drop_out_of_default_listing() {
    let app = TestApp::new().await;

    let keep = app.seed_vendor("Kept Vendor", "kept@vendor.example").await;
    let hide = app.seed_vendor("Hidden Vendor", "hidden@vendor.example").await;

    let response = app
        .request_authenticated(Method::POST, &format!("/api/v1/vendors/{}/hide", hide), None)
        .await;
    assert_eq!(response.status(), 200);

    let listed = response_json(app.request(Method::GET, "/api/v1/vendors", None, None).await).await;
    assert_eq!(listed["data"]["pagination"]["total"], 1);
    assert_eq!(listed["data"]["data"][0]["id"], keep.to_string().as_str());

    let all = response_json(
        app.request(Method::GET, "/api/v1/vendors?include_hidden=true", None, None)
            .await,
    )
    .await;
    assert_eq!(all["data"]["pagination"]["total"], 2);
}

#[tokio::test]
async fn announcement_bccs_every_visible_vendor() {
    let app = TestApp::new().await;

    app.seed_vendor("Alpha Metals", "alpha@metals.example").await;
    app.seed_vendor("Beta Plastics", "beta@plastics.example").await;
    let hidden = app.seed_vendor("Gamma Glass", "gamma@glass.example").await;
    app.request_authenticated(Method::POST, &format!("/api/v1/vendors/{}/hide", hidden), None)
        .await;

    let announce = app
        .request_authenticated(
            Method::POST,
            "/api/v1/vendors/announce",
            Some(json!({
                "subject": "Holiday schedule",
                "message": "Our receiving dock closes December 24 through January 2.",
            })),
        )
        .await;
    assert_eq!(announce.status(), 200);
    let body = response_json(announce).await;
    assert_eq!(body["data"]["recipient_count"], 2);

    let email = app
        .mailer
        .sent()
        .into_iter()
        .find(|mail| mail.subject == "Holiday schedule")
        .expect("announcement email captured");
    assert!(email.to.is_empty(), "announcements must not expose addresses");
    assert_eq!(email.bcc.len(), 2);
    assert!(email.bcc.contains(&"alpha@metals.example".to_string()));
    assert!(email.bcc.contains(&"beta@plastics.example".to_string()));
    assert!(!email.bcc.contains(&"gamma@glass.example".to_string()));
}

#[tokio::test]
async fn announcement_without_vendors_sends_nothing() {
    let app = TestApp::new().await;

    let announce = app
        .request_authenticated(
            Method::POST,
            "/api/v1/vendors/announce",
            Some(json!({"subject": "Empty blast", "message": "Anyone there?"})),
        )
        .await;
    assert_eq!(announce.status(), 200);
    assert_eq!(response_json(announce).await["data"]["recipient_count"], 0);

    let matching = app
        .mailer
        .sent()
        .into_iter()
        .filter(|mail| mail.subject == "Empty blast")
        .count();
    assert_eq!(matching, 0);
}

#[tokio::test]
async fn announcement_requires_a_token() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/vendors/announce",
            Some(json!({"subject": "Drive-by", "message": "No token attached."})),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);
}
