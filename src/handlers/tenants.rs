use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    errors::{ApiError, ServiceError},
    handlers::AppState,
    services::tenants::{ResendVerificationOutcome, VerifyEmailOutcome},
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match = "password")]
    pub password_confirmation: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyEmailQuery {
    /// Verification token from the email link
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResendVerificationRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordResetConfirmRequest {
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match = "password")]
    pub password_confirmation: String,
}

// Handler functions

/// Register a tenant with its owner account
#[utoipa::path(
    post,
    path = "/api/v1/tenants/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Tenant registered", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email or company already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let registration = state
        .services
        .tenants
        .register(
            payload.company_name,
            payload.name,
            payload.email,
            payload.password,
        )
        .await
        .map_err(map_service_error)?;

    info!(
        "Tenant registered: {} ({})",
        registration.tenant.company_name, registration.domain
    );
    Ok(created_response(json!({
        "tenant_id": registration.tenant.id,
        "company_name": registration.tenant.company_name,
        "domain": registration.domain,
        "message": "Registration successful; check your inbox for a verification link"
    })))
}

/// Verify an email address from the emailed link
#[utoipa::path(
    get,
    path = "/api/v1/tenants/verify-email",
    params(VerifyEmailQuery),
    responses(
        (status = 200, description = "Email verified", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid or expired token", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let outcome = state
        .services
        .tenants
        .verify_email(&params.token)
        .await
        .map_err(map_service_error)?;

    let message = match outcome {
        VerifyEmailOutcome::Verified => "Email verified; you can now log in",
        VerifyEmailOutcome::AlreadyVerified => "Email is already verified",
    };
    Ok(success_response(json!({ "message": message })))
}

/// Resend the verification email
#[utoipa::path(
    post,
    path = "/api/v1/tenants/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Verification email sent", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid token", body = crate::errors::ErrorResponse),
        (status = 502, description = "Mail delivery failed", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<ResendVerificationRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let outcome = state
        .services
        .tenants
        .resend_verification(&payload.token)
        .await
        .map_err(map_service_error)?;

    let message = match outcome {
        ResendVerificationOutcome::Sent => "Verification email sent; check your inbox",
        ResendVerificationOutcome::AlreadyVerified => "Email is already verified",
    };
    Ok(success_response(json!({ "message": message })))
}

/// Log in and receive a token pair
#[utoipa::path(
    post,
    path = "/api/v1/tenants/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::ApiResponse<serde_json::Value>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
        (status = 403, description = "Email not verified", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let session = state
        .services
        .tenants
        .login(payload.email, payload.password)
        .await
        .map_err(map_service_error)?;

    info!("Login for tenant {}", session.tenant_id);
    Ok(success_response(session))
}

/// Exchange a refresh token for a fresh token pair
#[utoipa::path(
    post,
    path = "/api/v1/tenants/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token pair refreshed", body = crate::ApiResponse<serde_json::Value>),
        (status = 401, description = "Invalid or revoked refresh token", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let tokens = state
        .services
        .auth
        .refresh_token(&payload.refresh_token)
        .await
        .map_err(|e| map_service_error(ServiceError::from(e)))?;

    Ok(success_response(tokens))
}

/// Revoke a refresh token
#[utoipa::path(
    post,
    path = "/api/v1/tenants/logout",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Logged out", body = crate::ApiResponse<serde_json::Value>),
        (status = 401, description = "Invalid refresh token", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .auth
        .logout(&payload.refresh_token)
        .await
        .map_err(|e| map_service_error(ServiceError::from(e)))?;

    Ok(success_response(json!({ "message": "Logged out" })))
}

/// Request a password reset link by email
#[utoipa::path(
    post,
    path = "/api/v1/tenants/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset link sent", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "No account with that email", body = crate::errors::ErrorResponse),
        (status = 502, description = "Mail delivery failed", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .tenants
        .request_password_reset(payload.email)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "message": "Password reset link sent; check your inbox"
    })))
}

/// Check whether a password reset link is still usable
#[utoipa::path(
    get,
    path = "/api/v1/tenants/password-reset/{uid}/{token}",
    params(
        ("uid" = Uuid, Path, description = "User ID from the reset link"),
        ("token" = String, Path, description = "Reset token from the link")
    ),
    responses(
        (status = 200, description = "Link is valid", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid, used, or expired link", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn check_password_reset(
    State(state): State<AppState>,
    Path((uid, token)): Path<(Uuid, String)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .tenants
        .check_password_reset(uid, &token)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(json!({
        "valid": true,
        "message": "Reset link is valid"
    })))
}

/// Set a new password using a reset link
#[utoipa::path(
    post,
    path = "/api/v1/tenants/password-reset/{uid}/{token}",
    params(
        ("uid" = Uuid, Path, description = "User ID from the reset link"),
        ("token" = String, Path, description = "Reset token from the link")
    ),
    request_body = PasswordResetConfirmRequest,
    responses(
        (status = 200, description = "Password updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid, used, or expired link", body = crate::errors::ErrorResponse)
    ),
    tag = "tenants"
)]
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Path((uid, token)): Path<(Uuid, String)>,
    Json(payload): Json<PasswordResetConfirmRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .tenants
        .confirm_password_reset(uid, &token, payload.password)
        .await
        .map_err(map_service_error)?;

    info!("Password reset completed for user {}", uid);
    Ok(success_response(json!({
        "message": "Password updated; you can now log in"
    })))
}

// Registration, verification, and credential flows all run before the
// caller has a token, so none of these routes take the auth layer.
pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-email", get(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/password-reset", post(request_password_reset))
        .route(
            "/password-reset/:uid/:token",
            get(check_password_reset).post(confirm_password_reset),
        )
}
