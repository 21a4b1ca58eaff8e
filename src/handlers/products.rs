use super::common::{
    created_response, map_service_error, parse_status, success_response, validate_input,
    ListParams, PaginatedResponse,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::product::ProductType,
    errors::ApiError,
    handlers::AppState,
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
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub unit_id: Option<Uuid>,
    /// One of consumable, storeable, service
    pub product_type: String,
    pub category_id: Option<Uuid>,
    pub vendor_id: Uuid,
    #[validate(custom = "crate::commands::validate_money")]
    pub cost_price: Decimal,
    #[validate(custom = "crate::commands::validate_money")]
    pub selling_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub unit_id: Option<Uuid>,
    pub product_type: Option<String>,
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    #[validate(custom = "crate::commands::validate_money")]
    pub cost_price: Option<Decimal>,
    #[validate(custom = "crate::commands::validate_money")]
    pub selling_price: Option<Decimal>,
}

// Handler functions

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product_type: ProductType = parse_status(&payload.product_type)?;

    let product = state
        .services
        .products
        .create_product(
            payload.name,
            payload.unit_id,
            product_type,
            payload.category_id,
            payload.vendor_id,
            payload.cost_price,
            payload.selling_price,
        )
        .await
        .map_err(map_service_error)?;

    info!("Product created: {}", product.id);
    Ok(created_response(product))
}

/// List products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListParams),
    responses(
        (status = 200, description = "Products listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (products, total) = state
        .services
        .products
        .list_products(params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        products,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product fetched", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    request_body = UpdateProductRequest,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product_type = payload
        .product_type
        .as_deref()
        .map(parse_status::<ProductType>)
        .transpose()?;

    let product = state
        .services
        .products
        .update_product(
            id,
            payload.name,
            payload.unit_id,
            product_type,
            payload.category_id,
            payload.vendor_id,
            payload.cost_price,
            payload.selling_price,
        )
        .await
        .map_err(map_service_error)?;

    info!("Product updated: {}", id);
    Ok(success_response(product))
}

/// Toggle the hidden flag on a product
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/hide",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn hide_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .hide_product(id)
        .await
        .map_err(map_service_error)?;

    info!(hidden = product.is_hidden, "Product hide toggled: {}", id);
    Ok(success_response(product))
}

pub fn product_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product));
    let write = Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product))
        .route("/:id/hide", post(hide_product))
        .with_auth();
    read.merge(write)
}
