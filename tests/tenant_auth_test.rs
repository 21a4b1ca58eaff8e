//! Integration tests for tenant onboarding: registration, email
//! verification, login, token refresh and password recovery.
//!
//! Every flow drives the HTTP surface end to end; tokens are pulled out of
//! the captured emails exactly the way a user would follow the links.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use procura_api::notifications::OutboundEmail;
use serde_json::json;

fn emails_to(app: &TestApp, recipient: &str, subject: &str) -> Vec<OutboundEmail> {
    app.mailer
        .sent()
        .into_iter()
        .filter(|mail| {
            mail.subject == subject && mail.to.iter().any(|to| to == recipient)
        })
        .collect()
}

/// Pull the `token=` query value out of a verification email body.
fn extract_query_token(body: &str) -> String {
    let start = body.find("token=").expect("token in email body") + "token=".len();
    body[start..]
        .split_whitespace()
        .next()
        .expect("token value")
        .to_string()
}

/// Pull the `{uid}/{token}` tail out of a password reset link.
fn extract_reset_parts(body: &str) -> (String, String) {
    let line = body
        .lines()
        .find(|line| line.contains("/password-reset/"))
        .expect("reset link in email body");
    let mut segments = line.trim().rsplit('/');
    let token = segments.next().expect("token segment").to_string();
    let uid = segments.next().expect("uid segment").to_string();
    (uid, token)
}

async fn register(app: &TestApp, company: &str, email: &str, password: &str) -> serde_json::Value {
    let response = app
        .request(
            Method::POST,
            "/api/v1/tenants/register",
            Some(json!({
                "company_name": company,
                "name": "Jane Doe",
                "email": email,
                "password": password,
                "password_confirmation": password,
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await
}

#[tokio::test]
async fn register_verify_and_login_round_trip() {
    let app = TestApp::new().await;

    let registered = register(&app, "Globex Industrial", "jane@globex.example", "orbital-hammer-9").await;
    assert_eq!(registered["data"]["company_name"], "Globex Industrial");
    let domain = registered["data"]["domain"].as_str().expect("tenant domain");
    assert!(domain.starts_with("globex-industrial."));

    // The account exists but cannot log in until the emailed link is used.
    let early_login = app
        .request(
            Method::POST,
            "/api/v1/tenants/login",
            Some(json!({"email": "jane@globex.example", "password": "orbital-hammer-9"})),
            None,
        )
        .await;
    assert_eq!(early_login.status(), 403);

    let verification = emails_to(&app, "jane@globex.example", "Verify your email address");
    assert_eq!(verification.len(), 1);
    let token = extract_query_token(&verification[0].body);

    let verify = app
        .request(
            Method::GET,
            &format!("/api/v1/tenants/verify-email?token={}", token),
            None,
            None,
        )
        .await;
    assert_eq!(verify.status(), 200);
    assert_eq!(
        response_json(verify).await["data"]["message"],
        "Email verified; you can now log in"
    );

    // Clicking the link twice is harmless.
    let again = app
        .request(
            Method::GET,
            &format!("/api/v1/tenants/verify-email?token={}", token),
            None,
            None,
        )
        .await;
    assert_eq!(
        response_json(again).await["data"]["message"],
        "Email is already verified"
    );

    let login = app
        .request(
            Method::POST,
            "/api/v1/tenants/login",
            Some(json!({"email": "jane@globex.example", "password": "orbital-hammer-9"})),
            None,
        )
        .await;
    assert_eq!(login.status(), 200);
    let session = response_json(login).await;
    assert_eq!(session["data"]["company_name"], "Globex Industrial");
    assert_eq!(session["data"]["token_type"], "Bearer");
    let access = session["data"]["access_token"].as_str().expect("access token").to_string();

    // The fresh token opens the write surface.
    let create = app
        .request(
            Method::POST,
            "/api/v1/units",
            Some(json!({"name": "Pallet"})),
            Some(&access),
        )
        .await;
    assert_eq!(create.status(), 201);
}

#[tokio::test]
async fn registration_rejects_mismatches_and_duplicates() {
    let app = TestApp::new().await;

    let mismatch = app
        .request(
            Method::POST,
            "/api/v1/tenants/register",
            Some(json!({
                "company_name": "Mismatch Corp",
                "name": "Jane Doe",
                "email": "jane@mismatch.example",
                "password": "orbital-hammer-9",
                "password_confirmation": "different-entirely",
            })),
            None,
        )
        .await;
    assert_eq!(mismatch.status(), 400);

    register(&app, "Initech", "peter@initech.example", "orbital-hammer-9").await;

    let duplicate_email = app
        .request(
            Method::POST,
            "/api/v1/tenants/register",
            Some(json!({
                "company_name": "Initech Two",
                "name": "Peter Gibbons",
                "email": "peter@initech.example",
                "password": "orbital-hammer-9",
                "password_confirmation": "orbital-hammer-9",
            })),
            None,
        )
        .await;
    assert_eq!(duplicate_email.status(), 409);

    let duplicate_company = app
        .request(
            Method::POST,
            "/api/v1/tenants/register",
            Some(json!({
                "company_name": "Initech",
                "name": "Samir Nagheenanajar",
                "email": "samir@initech.example",
                "password": "orbital-hammer-9",
                "password_confirmation": "orbital-hammer-9",
            })),
            None,
        )
        .await;
    assert_eq!(duplicate_company.status(), 409);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::new().await;

    let unknown = app
        .request(
            Method::POST,
            "/api/v1/tenants/login",
            Some(json!({"email": "nobody@nowhere.example", "password": "whatever-here"})),
            None,
        )
        .await;
    assert_eq!(unknown.status(), 401);

    let wrong_password = app
        .request(
            Method::POST,
            "/api/v1/tenants/login",
            Some(json!({"email": "admin@acme-procurement.test", "password": "not-the-password"})),
            None,
        )
        .await;
    assert_eq!(wrong_password.status(), 401);
}

#[tokio::test]
async fn refresh_rotates_and_logout_revokes() {
    let app = TestApp::new().await;

    let login = app
        .request(
            Method::POST,
            "/api/v1/tenants/login",
            Some(json!({
                "email": "admin@acme-procurement.test",
                "password": "correct-horse-battery",
            })),
            None,
        )
        .await;
    assert_eq!(login.status(), 200);
    let session = response_json(login).await;
    let first_refresh = session["data"]["refresh_token"]
        .as_str()
        .expect("refresh token")
        .to_string();
    let access = session["data"]["access_token"].as_str().expect("access token").to_string();

    // An access token is not accepted where a refresh token belongs.
    let wrong_kind = app
        .request(
            Method::POST,
            "/api/v1/tenants/refresh",
            Some(json!({"refresh_token": access})),
            None,
        )
        .await;
    assert_eq!(wrong_kind.status(), 401);

    let refresh = app
        .request(
            Method::POST,
            "/api/v1/tenants/refresh",
            Some(json!({"refresh_token": first_refresh})),
            None,
        )
        .await;
    assert_eq!(refresh.status(), 200);
    let rotated = response_json(refresh).await;
    let second_refresh = rotated["data"]["refresh_token"]
        .as_str()
        .expect("rotated refresh token")
        .to_string();
    assert!(rotated["data"]["access_token"].as_str().is_some());

    // Rotation revoked the first token.
    let replay = app
        .request(
            Method::POST,
            "/api/v1/tenants/refresh",
            Some(json!({"refresh_token": first_refresh})),
            None,
        )
        .await;
    assert_eq!(replay.status(), 401);

    let logout = app
        .request(
            Method::POST,
            "/api/v1/tenants/logout",
            Some(json!({"refresh_token": second_refresh})),
            None,
        )
        .await;
    assert_eq!(logout.status(), 200);
    assert_eq!(response_json(logout).await["data"]["message"], "Logged out");

    let after_logout = app
        .request(
            Method::POST,
            "/api/v1/tenants/refresh",
            Some(json!({"refresh_token": second_refresh})),
            None,
        )
        .await;
    assert_eq!(after_logout.status(), 401);
}

#[tokio::test]
async fn resend_verification_issues_a_fresh_link() {
    let app = TestApp::new().await;

    register(&app, "Resend Labs", "ada@resend.example", "orbital-hammer-9").await;
    let first = emails_to(&app, "ada@resend.example", "Verify your email address");
    assert_eq!(first.len(), 1);
    let stale_token = extract_query_token(&first[0].body);

    let resend = app
        .request(
            Method::POST,
            "/api/v1/tenants/resend-verification",
            Some(json!({"token": stale_token})),
            None,
        )
        .await;
    assert_eq!(resend.status(), 200);
    assert_eq!(
        response_json(resend).await["data"]["message"],
        "Verification email sent; check your inbox"
    );

    let all = emails_to(&app, "ada@resend.example", "Verify your email address");
    assert_eq!(all.len(), 2);
    let fresh_token = extract_query_token(&all[1].body);

    let verify = app
        .request(
            Method::GET,
            &format!("/api/v1/tenants/verify-email?token={}", fresh_token),
            None,
            None,
        )
        .await;
    assert_eq!(verify.status(), 200);

    // Once verified, asking again reports that instead of mailing.
    let after = app
        .request(
            Method::POST,
            "/api/v1/tenants/resend-verification",
            Some(json!({"token": fresh_token})),
            None,
        )
        .await;
    assert_eq!(
        response_json(after).await["data"]["message"],
        "Email is already verified"
    );
}

#[tokio::test]
async fn password_reset_replaces_the_credential_once() {
    let app = TestApp::new().await;

    let request = app
        .request(
            Method::POST,
            "/api/v1/tenants/password-reset",
            Some(json!({"email": "admin@acme-procurement.test"})),
            None,
        )
        .await;
    assert_eq!(request.status(), 200);

    let reset_mail = emails_to(&app, "admin@acme-procurement.test", "Reset your password");
    assert_eq!(reset_mail.len(), 1);
    let (uid, token) = extract_reset_parts(&reset_mail[0].body);

    let check = app
        .request(
            Method::GET,
            &format!("/api/v1/tenants/password-reset/{}/{}", uid, token),
            None,
            None,
        )
        .await;
    assert_eq!(check.status(), 200);
    assert_eq!(response_json(check).await["data"]["valid"], true);

    let confirm = app
        .request(
            Method::POST,
            &format!("/api/v1/tenants/password-reset/{}/{}", uid, token),
            Some(json!({
                "password": "fresh-new-secret-1",
                "password_confirmation": "fresh-new-secret-1",
            })),
            None,
        )
        .await;
    assert_eq!(confirm.status(), 200);

    let old_password = app
        .request(
            Method::POST,
            "/api/v1/tenants/login",
            Some(json!({
                "email": "admin@acme-procurement.test",
                "password": "correct-horse-battery",
            })),
            None,
        )
        .await;
    assert_eq!(old_password.status(), 401);

    let new_password = app
        .request(
            Method::POST,
            "/api/v1/tenants/login",
            Some(json!({
                "email": "admin@acme-procurement.test",
                "password": "fresh-new-secret-1",
            })),
            None,
        )
        .await;
    assert_eq!(new_password.status(), 200);

    // The link is single use.
    let replay = app
        .request(
            Method::POST,
            &format!("/api/v1/tenants/password-reset/{}/{}", uid, token),
            Some(json!({
                "password": "does-not-matter-1",
                "password_confirmation": "does-not-matter-1",
            })),
            None,
        )
        .await;
    assert_eq!(replay.status(), 400);
}

#[tokio::test]
async fn password_reset_needs_a_known_verified_account() {
    let app = TestApp::new().await;

    let unknown = app
        .request(
            Method::POST,
            "/api/v1/tenants/password-reset",
            Some(json!({"email": "ghost@nowhere.example"})),
            None,
        )
        .await;
    assert_eq!(unknown.status(), 404);

    register(&app, "Unverified Co", "new@unverified.example", "orbital-hammer-9").await;
    let unverified = app
        .request(
            Method::POST,
            "/api/v1/tenants/password-reset",
            Some(json!({"email": "new@unverified.example"})),
            None,
        )
        .await;
    assert_eq!(unverified.status(), 403);
}

#[tokio::test]
async fn verification_endpoint_rejects_access_tokens() {
    let app = TestApp::new().await;

    // An access token is not a verification token, even though both are
    // signed with the same key.
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/tenants/verify-email?token={}", app.token()),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Bad request: Invalid verification token");
}
