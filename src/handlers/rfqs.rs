use super::common::{
    created_response, map_service_error, parse_status, success_response, validate_input,
    DocumentItemRequest, DocumentItemView, DocumentListParams, PaginatedResponse,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    commands::rfqs::{
        CreateRfqCommand, RecordRfqQuoteCommand, ReplaceRfqItemsCommand, UpdateRfqCommand,
    },
    entities::{
        rfq::{self, RfqStatus},
        rfq_item, rfq_vendor_quote, rfq_vendor_quote_item,
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
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRfqRequest {
    pub vendor_id: Uuid,
    /// Quote deadline in YYYY-MM-DD format
    pub expiry_date: Option<String>,
    #[validate(length(min = 1))]
    pub items: Vec<DocumentItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRfqRequest {
    pub vendor_id: Option<Uuid>,
    /// Quote deadline in YYYY-MM-DD format
    pub expiry_date: Option<String>,
    /// One of awaiting, selected, cancelled
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

/// An RFQ with its line items and derived total.
#[derive(Debug, Serialize)]
pub struct RfqView {
    #[serde(flatten)]
    pub header: rfq::Model,
    pub items: Vec<DocumentItemView>,
    pub total: Decimal,
}

/// A recorded vendor quote with its line items and derived total.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub header: rfq_vendor_quote::Model,
    pub items: Vec<DocumentItemView>,
    pub total: Decimal,
}

fn document_view(header: rfq::Model, items: Vec<rfq_item::Model>) -> RfqView {
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
    RfqView {
        header,
        items,
        total,
    }
}

fn quote_view(
    header: rfq_vendor_quote::Model,
    items: Vec<rfq_vendor_quote_item::Model>,
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

fn parse_expiry_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiError::ValidationError(format!("Invalid expiry date '{}', expected YYYY-MM-DD", raw))
    })
}

// Handler functions

/// Create an RFQ
#[utoipa::path(
    post,
    path = "/api/v1/rfqs",
    request_body = CreateRfqRequest,
    responses(
        (status = 201, description = "RFQ created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn create_rfq(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateRfqRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let expiry_date = payload
        .expiry_date
        .as_deref()
        .map(parse_expiry_date)
        .transpose()?;
    let command = CreateRfqCommand {
        vendor_id: payload.vendor_id,
        expiry_date,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .rfqs
        .create_rfq(command)
        .await
        .map_err(map_service_error)?;

    info!("RFQ created: {}", header.id);
    Ok(created_response(document_view(header, items)))
}

/// List RFQs
#[utoipa::path(
    get,
    path = "/api/v1/rfqs",
    params(DocumentListParams),
    responses(
        (status = 200, description = "RFQs retrieved", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "rfqs"
)]
pub async fn list_rfqs(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(parse_status::<RfqStatus>)
        .transpose()?;
    let (rows, total) = state
        .services
        .rfqs
        .list_rfqs(status, params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        rows,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get an RFQ with items and total
#[utoipa::path(
    get,
    path = "/api/v1/rfqs/{id}",
    params(("id" = String, Path, description = "RFQ ID")),
    responses(
        (status = 200, description = "RFQ retrieved", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "RFQ not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn get_rfq(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (header, items) = state
        .services
        .rfqs
        .get_rfq(&id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(document_view(header, items)))
}

/// Update an RFQ header
#[utoipa::path(
    put,
    path = "/api/v1/rfqs/{id}",
    params(("id" = String, Path, description = "RFQ ID")),
    request_body = UpdateRfqRequest,
    responses(
        (status = 200, description = "RFQ updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "RFQ not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn update_rfq(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRfqRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let expiry_date = payload
        .expiry_date
        .as_deref()
        .map(parse_expiry_date)
        .transpose()?;
    let status = payload
        .status
        .as_deref()
        .map(parse_status::<RfqStatus>)
        .transpose()?;
    let command = UpdateRfqCommand {
        rfq_id: id,
        vendor_id: payload.vendor_id,
        expiry_date,
        status,
    };
    let (header, items) = state
        .services
        .rfqs
        .update_rfq(command)
        .await
        .map_err(map_service_error)?;

    info!("RFQ updated: {}", header.id);
    Ok(success_response(document_view(header, items)))
}

/// Replace the line items of an RFQ
#[utoipa::path(
    put,
    path = "/api/v1/rfqs/{id}/items",
    params(("id" = String, Path, description = "RFQ ID")),
    request_body = ReplaceItemsRequest,
    responses(
        (status = 200, description = "Items replaced", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "RFQ not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn replace_rfq_items(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ReplaceItemsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = ReplaceRfqItemsCommand {
        rfq_id: id,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .rfqs
        .replace_rfq_items(command)
        .await
        .map_err(map_service_error)?;

    info!("RFQ items replaced: {}", header.id);
    Ok(success_response(document_view(header, items)))
}

/// Toggle the hidden flag of an RFQ
#[utoipa::path(
    post,
    path = "/api/v1/rfqs/{id}/hide",
    params(("id" = String, Path, description = "RFQ ID")),
    responses(
        (status = 200, description = "Hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "RFQ not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn hide_rfq(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let header = state
        .services
        .rfqs
        .hide_rfq(&id)
        .await
        .map_err(map_service_error)?;

    info!("RFQ {} hidden flag set to {}", header.id, header.is_hidden);
    Ok(success_response(header))
}

/// Email the RFQ to its vendor
#[utoipa::path(
    post,
    path = "/api/v1/rfqs/{id}/send",
    params(("id" = String, Path, description = "RFQ ID")),
    responses(
        (status = 200, description = "RFQ emailed to the vendor", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "RFQ not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Mail delivery failed", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn send_rfq(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let vendor_email = state
        .services
        .rfqs
        .send_rfq(&id)
        .await
        .map_err(map_service_error)?;

    info!("RFQ sent: {} -> {}", id, vendor_email);
    Ok(success_response(json!({
        "id": id,
        "vendor_email": vendor_email,
        "message": "RFQ sent to vendor"
    })))
}

/// Record a vendor quote against an RFQ
#[utoipa::path(
    post,
    path = "/api/v1/rfqs/{id}/quotes",
    params(("id" = String, Path, description = "RFQ ID")),
    request_body = RecordQuoteRequest,
    responses(
        (status = 201, description = "Quote recorded", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "RFQ not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn record_rfq_quote(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<RecordQuoteRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = RecordRfqQuoteCommand {
        rfq_id: id,
        vendor_id: payload.vendor_id,
        items: payload.items.into_iter().map(Into::into).collect(),
    };
    let (header, items) = state
        .services
        .rfqs
        .record_quote(command)
        .await
        .map_err(map_service_error)?;

    info!("Quote {} recorded for RFQ {}", header.id, header.rfq_id);
    Ok(created_response(quote_view(header, items)))
}

/// List the quotes recorded against an RFQ
#[utoipa::path(
    get,
    path = "/api/v1/rfqs/{id}/quotes",
    params(("id" = String, Path, description = "RFQ ID")),
    responses(
        (status = 200, description = "Quotes retrieved", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "RFQ not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn list_rfq_quotes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let quotes = state
        .services
        .rfqs
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
    path = "/api/v1/rfqs/quotes/{quote_id}",
    params(("quote_id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote retrieved", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Quote not found", body = crate::errors::ErrorResponse)
    ),
    tag = "rfqs"
)]
pub async fn get_rfq_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (header, items) = state
        .services
        .rfqs
        .get_quote(quote_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(quote_view(header, items)))
}

pub fn rfq_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_rfqs))
        .route("/quotes/:quote_id", get(get_rfq_quote))
        .route("/:id", get(get_rfq))
        .route("/:id/quotes", get(list_rfq_quotes));
    let write = Router::new()
        .route("/", post(create_rfq))
        .route("/:id", put(update_rfq))
        .route("/:id/items", put(replace_rfq_items))
        .route("/:id/hide", post(hide_rfq))
        .route("/:id/send", post(send_rfq))
        .route("/:id/quotes", post(record_rfq_quote))
        .with_auth();
    read.merge(write)
}
