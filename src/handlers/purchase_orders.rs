use super::common::{
    created_response, map_service_error, parse_status, success_response, validate_input,
    DocumentItemRequest, DocumentItemView, DocumentListParams, PaginatedResponse,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    commands::purchaseorders::{
        CreatePurchaseOrderCommand, RecordPurchaseOrderQuoteCommand,
        ReplacePurchaseOrderItemsCommand, UpdatePurchaseOrderCommand,
    },
    entities::{
        po_vendor_quote, po_vendor_quote_item,
        purchase_order::{self, PurchaseOrderStatus},
        purchase_order_item,
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
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub vendor_id: Uuid,
    #[validate(length(min = 1))]
    pub items: Vec<DocumentItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePurchaseOrderRequest {
    pub vendor_id: Option<Uuid>,
    /// One of draft, awaiting, completed, cancelled
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReplaceItemsRequest {
    #[validate(length(min = 1))]
    pub items: Vec<DocumentItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordQuoteRequest {
    pub vendor_id: Uuid,
    #[validate(length(min = 1))]
    pub items: Vec<DocumentItemRequest>,
}

/// A purchase order with its line items and derived total.
#[derive(Debug, Serialize)]
pub struct PurchaseOrderView {
    #[serde(flatten)]
    pub header: purchase_order::Model,
    pub items: Vec<DocumentItemView>,
    pub total: Decimal,
}

/// A recorded vendor quote with its line items and derived total.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub header: po_vendor_quote::Model,
    pub items: Vec<DocumentItemView>,
    pub total: Decimal,
}

fn document_view(
    header: purchase_order::Model,
    items: Vec<purchase_order_item::Model>,
) -> PurchaseOrderView {
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
    PurchaseOrderView {
        header,
        items,
        total,
    }
}

fn quote_view(
    header: po_vendor_quote::Model,
    items: Vec<po_vendor_quote_item::Model>,
) -> QuoteView {
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
    QuoteView {
        header,
        items,
        total,
    }
}

// Handler functions

/// Create a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreatePurchaseOrderCommand {
        vendor_id: payload.vendor_id,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .purchase_orders
        .create_purchase_order(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", header.id);
    Ok(created_response(document_view(header, items)))
}

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(DocumentListParams),
    responses(
        (status = 200, description = "Purchase orders retrieved", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(parse_status::<PurchaseOrderStatus>)
        .transpose()?;
    let (rows, total) = state
        .services
        .purchase_orders
        .list_purchase_orders(status, params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        rows,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a purchase order with items and total
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = String, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order retrieved", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (header, items) = state
        .services
        .purchase_orders
        .get_purchase_order(&id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(document_view(header, items)))
}

/// Update a purchase order header
#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = String, Path, description = "Purchase order ID")),
    request_body = UpdatePurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let status = payload
        .status
        .as_deref()
        .map(parse_status::<PurchaseOrderStatus>)
        .transpose()?;
    let command = UpdatePurchaseOrderCommand {
        purchase_order_id: id,
        vendor_id: payload.vendor_id,
        status,
    };
    let (header, items) = state
        .services
        .purchase_orders
        .update_purchase_order(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order updated: {}", header.id);
    Ok(success_response(document_view(header, items)))
}

/// Replace the line items of a purchase order
#[utoipa::path(
    put,
    path = "/api/v1/purchase-orders/{id}/items",
    params(("id" = String, Path, description = "Purchase order ID")),
    request_body = ReplaceItemsRequest,
    responses(
        (status = 200, description = "Items replaced", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn replace_purchase_order_items(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ReplaceItemsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = ReplacePurchaseOrderItemsCommand {
        purchase_order_id: id,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .purchase_orders
        .replace_purchase_order_items(command)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order items replaced: {}", header.id);
    Ok(success_response(document_view(header, items)))
}

/// Toggle the hidden flag of a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/hide",
    params(("id" = String, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn hide_purchase_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let header = state
        .services
        .purchase_orders
        .hide_purchase_order(&id)
        .await
        .map_err(map_service_error)?;

    info!(
        "Purchase order {} hidden flag set to {}",
        header.id, header.is_hidden
    );
    Ok(success_response(header))
}

/// Email the purchase order to its vendor
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/send",
    params(("id" = String, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order emailed to the vendor", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Mail delivery failed", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn send_purchase_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let vendor_email = state
        .services
        .purchase_orders
        .send_purchase_order(&id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order sent: {} -> {}", id, vendor_email);
    Ok(success_response(json!({
        "id": id,
        "vendor_email": vendor_email,
        "message": "Purchase order sent to vendor"
    })))
}

/// Record a vendor quote against a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/quotes",
    params(("id" = String, Path, description = "Purchase order ID")),
    request_body = RecordQuoteRequest,
    responses(
        (status = 201, description = "Quote recorded", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn record_purchase_order_quote(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<RecordQuoteRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = RecordPurchaseOrderQuoteCommand {
        purchase_order_id: id,
        vendor_id: payload.vendor_id,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .purchase_orders
        .record_quote(command)
        .await
        .map_err(map_service_error)?;

    info!(
        "Quote {} recorded for purchase order {}",
        header.id, header.purchase_order_id
    );
    Ok(created_response(quote_view(header, items)))
}

/// List the quotes recorded against a purchase order
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}/quotes",
    params(("id" = String, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Quotes retrieved", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_order_quotes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let quotes = state
        .services
        .purchase_orders
        .list_quotes(&id)
        .await
        .map_err(map_service_error)?;

    let views: Vec<QuoteView> = quotes
        .into_iter()
        .map(|(header, items)| quote_view(header, items))
        .collect();
    Ok(success_response(views))
}

/// Get a single recorded quote
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/quotes/{quote_id}",
    params(("quote_id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote retrieved", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Quote not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (header, items) = state
        .services
        .purchase_orders
        .get_quote(quote_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(quote_view(header, items)))
}

pub fn purchase_order_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_purchase_orders))
        .route("/quotes/:quote_id", get(get_purchase_order_quote))
        .route("/:id", get(get_purchase_order))
        .route("/:id/quotes", get(list_purchase_order_quotes));
    let write = Router::new()
        .route("/", post(create_purchase_order))
        .route("/:id", put(update_purchase_order))
        .route("/:id/items", put(replace_purchase_order_items))
        .route("/:id/hide", post(hide_purchase_order))
        .route("/:id/send", post(send_purchase_order))
        .route("/:id/quotes", post(record_purchase_order_quote))
        .with_auth();
    read.merge(write)
}
