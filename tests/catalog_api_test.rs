//! Integration tests for the catalog resources: units of measure, product
//! categories, departments and vendor categories.
//!
//! Reads are public; every mutation requires a bearer token. Hiding is a
//! toggle that drops a record from default listings without deleting it.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn create_and_fetch_unit() {
    let app = TestApp::new().await;

    let create = app
        .request_authenticated(
            Method::POST,
            "/api/v1/units",
            Some(json!({
                "name": "Kilogram",
                "description": "Base weight unit",
            })),
        )
        .await;
    assert_eq!(create.status(), 201);
    let created = response_json(create).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["name"], "Kilogram");
    let id = created["data"]["id"].as_str().expect("unit id").to_string();

    let fetch = app
        .request(Method::GET, &format!("/api/v1/units/{}", id), None, None)
        .await;
    assert_eq!(fetch.status(), 200);
    let fetched = response_json(fetch).await;
    assert_eq!(fetched["data"]["name"], "Kilogram");
    assert_eq!(fetched["data"]["description"], "Base weight unit");
    assert_eq!(fetched["data"]["is_hidden"], false);

    let list = app.request(Method::GET, "/api/v1/units", None, None).await;
    assert_eq!(list.status(), 200);
    let listed = response_json(list).await;
    assert_eq!(listed["data"]["pagination"]["total"], 1);
    assert_eq!(listed["data"]["data"][0]["id"], id.as_str());
}

#[tokio::test]
async fn update_unit_changes_only_provided_fields() {
    let app = TestApp::new().await;

    let create = app
        .request_authenticated(
            Method::POST,
            "/api/v1/units",
            Some(json!({"name": "Box", "description": "12 pieces"})),
        )
        .await;
    let id = response_json(create).await["data"]["id"]
        .as_str()
        .expect("unit id")
        .to_string();

    let update = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/units/{}", id),
            Some(json!({"name": "Box of 12"})),
        )
        .await;
    assert_eq!(update.status(), 200);
    let updated = response_json(update).await;
    assert_eq!(updated["data"]["name"], "Box of 12");
    assert_eq!(updated["data"]["description"], "12 pieces");
}

#[tokio::test]
async fn hiding_a_unit_is_a_reversible_toggle() {
    let app = TestApp::new().await;

    for name in ["Litre", "Metre"] {
        let response = app
            .request_authenticated(Method::POST, "/api/v1/units", Some(json!({"name": name})))
            .await;
        assert_eq!(response.status(), 201);
    }
    let listed = response_json(app.request(Method::GET, "/api/v1/units", None, None).await).await;
    let litre_id = listed["data"]["data"]
        .as_array()
        .expect("unit rows")
        .iter()
        .find(|row| row["name"] == "Litre")
        .and_then(|row| row["id"].as_str())
        .expect("litre id")
        .to_string();

    let hide = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/units/{}/hide", litre_id),
            None,
        )
        .await;
    assert_eq!(hide.status(), 200);
    assert_eq!(response_json(hide).await["data"]["is_hidden"], true);

    let visible = response_json(app.request(Method::GET, "/api/v1/units", None, None).await).await;
    assert_eq!(visible["data"]["pagination"]["total"], 1);
    assert_eq!(visible["data"]["data"][0]["name"], "Metre");

    let all = response_json(
        app.request(Method::GET, "/api/v1/units?include_hidden=true", None, None)
            .await,
    )
    .await;
    assert_eq!(all["data"]["pagination"]["total"], 2);

    // A second hide request brings the record back.
    let unhide = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/units/{}/hide", litre_id),
            None,
        )
        .await;
    assert_eq!(response_json(unhide).await["data"]["is_hidden"], false);

    let restored = response_json(app.request(Method::GET, "/api/v1/units", None, None).await).await;
    assert_eq!(restored["data"]["pagination"]["total"], 2);
}

#[tokio::test]
async fn catalog_reads_are_public_but_writes_need_a_token() {
    let app = TestApp::new().await;

    let anonymous_list = app.request(Method::GET, "/api/v1/units", None, None).await;
    assert_eq!(anonymous_list.status(), 200);

    let anonymous_create = app
        .request(
            Method::POST,
            "/api/v1/units",
            Some(json!({"name": "Pallet"})),
            None,
        )
        .await;
    assert_eq!(anonymous_create.status(), 401);

    let garbage_token_create = app
        .request(
            Method::POST,
            "/api/v1/units",
            Some(json!({"name": "Pallet"})),
            Some("not-a-jwt"),
        )
        .await;
    assert_eq!(garbage_token_create.status(), 401);
}

#[tokio::test]
async fn unknown_unit_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/units/{}", Uuid::new_v4()),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(Method::POST, "/api/v1/units", Some(json!({"name": ""})))
        .await;
    assert_eq!(response.status(), 400);
}

#[rstest]
#[case::product_categories("/api/v1/product-categories", "Raw Materials")]
#[case::vendor_categories("/api/v1/vendor-categories", "Logistics Partners")]
#[tokio::test]
async fn named_entry_resources_share_the_crud_surface(
    #[case] base: &str,
    #[case] name: &str,
) {
    let app = TestApp::new().await;

    let create = app
        .request_authenticated(
            Method::POST,
            base,
            Some(json!({"name": name, "description": "Seeded by test"})),
        )
        .await;
    assert_eq!(create.status(), 201);
    let id = response_json(create).await["data"]["id"]
        .as_str()
        .expect("entry id")
        .to_string();

    let update = app
        .request_authenticated(
            Method::PUT,
            &format!("{}/{}", base, id),
            Some(json!({"description": "Adjusted"})),
        )
        .await;
    assert_eq!(update.status(), 200);
    let updated = response_json(update).await;
    assert_eq!(updated["data"]["name"], name);
    assert_eq!(updated["data"]["description"], "Adjusted");

    let hide = app
        .request_authenticated(Method::POST, &format!("{}/{}/hide", base, id), None)
        .await;
    assert_eq!(hide.status(), 200);

    let listed = response_json(app.request(Method::GET, base, None, None).await).await;
    assert_eq!(listed["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn departments_carry_a_bare_name() {
    let app = TestApp::new().await;

    let create = app
        .request_authenticated(
            Method::POST,
            "/api/v1/departments",
            Some(json!({"name": "Engineering"})),
        )
        .await;
    assert_eq!(create.status(), 201);
    let created = response_json(create).await;
    assert_eq!(created["data"]["name"], "Engineering");
    let id = created["data"]["id"].as_str().expect("department id").to_string();

    let rename = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/departments/{}", id),
            Some(json!({"name": "Platform Engineering"})),
        )
        .await;
    assert_eq!(rename.status(), 200);
    assert_eq!(
        response_json(rename).await["data"]["name"],
        "Platform Engineering"
    );
}
