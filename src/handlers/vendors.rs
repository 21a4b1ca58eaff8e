use super::common::{
    created_response, map_service_error, success_response, validate_input, ListParams,
    PaginatedResponse,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: String,
    pub category_id: Option<Uuid>,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 1000))]
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateVendorRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 1000))]
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnnounceRequest {
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
}

// Handler functions

/// Create a vendor
#[utoipa::path(
    post,
    path = "/api/v1/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateVendorRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vendor = state
        .services
        .vendors
        .create_vendor(
            payload.company_name,
            payload.category_id,
            payload.email,
            payload.address,
            payload.phone,
        )
        .await
        .map_err(map_service_error)?;

    info!("Vendor created: {}", vendor.id);
    Ok(created_response(vendor))
}

/// List vendors
#[utoipa::path(
    get,
    path = "/api/v1/vendors",
    params(ListParams),
    responses(
        (status = 200, description = "Vendors listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (vendors, total) = state
        .services
        .vendors
        .list_vendors(params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        vendors,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a vendor by ID
#[utoipa::path(
    get,
    path = "/api/v1/vendors/{id}",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor fetched", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .get_vendor(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vendor))
}

/// Update a vendor
#[utoipa::path(
    put,
    path = "/api/v1/vendors/{id}",
    request_body = UpdateVendorRequest,
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVendorRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vendor = state
        .services
        .vendors
        .update_vendor(
            id,
            payload.company_name,
            payload.category_id,
            payload.email,
            payload.address,
            payload.phone,
        )
        .await
        .map_err(map_service_error)?;

    info!("Vendor updated: {}", id);
    Ok(success_response(vendor))
}

/// Toggle the hidden flag on a vendor
#[utoipa::path(
    post,
    path = "/api/v1/vendors/{id}/hide",
    params(("id" = Uuid, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn hide_vendor(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .hide_vendor(id)
        .await
        .map_err(map_service_error)?;

    info!(hidden = vendor.is_hidden, "Vendor hide toggled: {}", id);
    Ok(success_response(vendor))
}

/// Send an announcement email to every visible vendor
#[utoipa::path(
    post,
    path = "/api/v1/vendors/announce",
    request_body = AnnounceRequest,
    responses(
        (status = 200, description = "Announcement sent", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 502, description = "Email delivery failed", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn announce(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<AnnounceRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let recipient_count = state
        .services
        .vendors
        .announce(payload.subject, payload.message)
        .await
        .map_err(map_service_error)?;

    info!(recipient_count, "Vendor announcement sent");
    Ok(success_response(serde_json::json!({
        "recipient_count": recipient_count,
        "message": "Announcement sent successfully"
    })))
}

pub fn vendor_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_vendors))
        .route("/:id", get(get_vendor));
    let write = Router::new()
        .route("/", post(create_vendor))
        .route("/announce", post(announce))
        .route("/:id", put(update_vendor))
        .route("/:id/hide", post(hide_vendor))
        .with_auth();
    read.merge(write)
}
