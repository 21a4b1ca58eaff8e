use super::common::{
    created_response, map_service_error, parse_status, success_response, validate_input,
    DocumentItemRequest, DocumentItemView, DocumentListParams, PaginatedResponse,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    commands::purchaserequests::{
        CreatePurchaseRequestCommand, ReplacePurchaseRequestItemsCommand,
        UpdatePurchaseRequestCommand,
    },
    entities::{
        purchase_request::{self, PurchaseRequestStatus},
        purchase_request_item,
    },
    errors::ApiError,
    handlers::AppState,
    money,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseRequestRequest {
    pub requester_id: Uuid,
    pub department_id: Option<Uuid>,
    #[validate(length(max = 1000))]
    pub purpose: Option<String>,
    pub suggested_vendor_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub items: Vec<DocumentItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePurchaseRequestRequest {
    pub department_id: Option<Uuid>,
    #[validate(length(max = 1000))]
    pub purpose: Option<String>,
    pub suggested_vendor_id: Option<Uuid>,
    /// One of draft, submitted, approved, rejected
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReplaceItemsRequest {
    #[validate(length(min = 1))]
    pub items: Vec<DocumentItemRequest>,
}

/// A purchase request with its line items and derived total.
#[derive(Debug, Serialize)]
pub struct PurchaseRequestView {
    #[serde(flatten)]
    pub header: purchase_request::Model,
    pub items: Vec<DocumentItemView>,
    pub total: Decimal,
}

fn document_view(
    header: purchase_request::Model,
    items: Vec<purchase_request_item::Model>,
) -> PurchaseRequestView {
    let items: Vec<DocumentItemView> = items
        .into_iter()
        .map(|item| {
            DocumentItemView::new(
                item.id,
                item.product_id,
                item.description,
                item.quantity,
                item.estimated_unit_price,
            )
        })
        .collect();
    let total = money::items_total(items.iter().map(|i| (i.quantity, i.estimated_unit_price)));
    PurchaseRequestView {
        header,
        items,
        total,
    }
}

// Handler functions

/// Create a purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests",
    request_body = CreatePurchaseRequestRequest,
    responses(
        (status = 201, description = "Purchase request created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn create_purchase_request(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreatePurchaseRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreatePurchaseRequestCommand {
        requester_id: payload.requester_id,
        department_id: payload.department_id,
        purpose: payload.purpose,
        suggested_vendor_id: payload.suggested_vendor_id,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .purchase_requests
        .create_purchase_request(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase request created: {}", header.id);
    Ok(created_response(document_view(header, items)))
}

/// List purchase requests
#[utoipa::path(
    get,
    path = "/api/v1/purchase-requests",
    params(DocumentListParams),
    responses(
        (status = 200, description = "Purchase requests retrieved", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "purchase-requests"
)]
pub async fn list_purchase_requests(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(parse_status::<PurchaseRequestStatus>)
        .transpose()?;
    let (rows, total) = state
        .services
        .purchase_requests
        .list_purchase_requests(status, params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        rows,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a purchase request with items and total
#[utoipa::path(
    get,
    path = "/api/v1/purchase-requests/{id}",
    params(("id" = String, Path, description = "Purchase request ID")),
    responses(
        (status = 200, description = "Purchase request retrieved", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn get_purchase_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (header, items) = state
        .services
        .purchase_requests
        .get_purchase_request(&id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(document_view(header, items)))
}

/// Update a purchase request header
#[utoipa::path(
    put,
    path = "/api/v1/purchase-requests/{id}",
    params(("id" = String, Path, description = "Purchase request ID")),
    request_body = UpdatePurchaseRequestRequest,
    responses(
        (status = 200, description = "Purchase request updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn update_purchase_request(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePurchaseRequestRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let status = payload
        .status
        .as_deref()
        .map(parse_status::<PurchaseRequestStatus>)
        .transpose()?;
    let command = UpdatePurchaseRequestCommand {
        purchase_request_id: id,
        department_id: payload.department_id,
        purpose: payload.purpose,
        suggested_vendor_id: payload.suggested_vendor_id,
        status,
    };
    let (header, items) = state
        .services
        .purchase_requests
        .update_purchase_request(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase request updated: {}", header.id);
    Ok(success_response(document_view(header, items)))
}

/// Replace the line items of a purchase request
#[utoipa::path(
    put,
    path = "/api/v1/purchase-requests/{id}/items",
    params(("id" = String, Path, description = "Purchase request ID")),
    request_body = ReplaceItemsRequest,
    responses(
        (status = 200, description = "Items replaced", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn replace_purchase_request_items(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ReplaceItemsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = ReplacePurchaseRequestItemsCommand {
        purchase_request_id: id,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .purchase_requests
        .replace_purchase_request_items(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase request items replaced: {}", header.id);
    Ok(success_response(document_view(header, items)))
}

/// Toggle the hidden flag of a purchase request
#[utoipa::path(
    post,
    path = "/api/v1/purchase-requests/{id}/hide",
    params(("id" = String, Path, description = "Purchase request ID")),
    responses(
        (status = 200, description = "Hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-requests"
)]
pub async fn hide_purchase_request(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let header = state
        .services
        .purchase_requests
        .hide_purchase_request(&id)
        .await
        .map_err(map_service_error)?;

    info!(
        "Purchase request {} hidden flag set to {}",
        header.id, header.is_hidden
    );
    Ok(success_response(header))
}

pub fn purchase_request_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_purchase_requests))
        .route("/:id", get(get_purchase_request));
    let write = Router::new()
        .route("/", post(create_purchase_request))
        .route("/:id", put(update_purchase_request))
        .route("/:id/items", put(replace_purchase_request_items))
        .route("/:id/hide", post(hide_purchase_request))
        .with_auth();
    read.merge(write)
}
