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

// Request DTOs. Units and both category kinds share a name/description
// shape; departments carry a bare name.

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateNamedEntryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateNamedEntryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

// Units of measure

/// Create a unit of measure
#[utoipa::path(
    post,
    path = "/api/v1/units",
    request_body = CreateNamedEntryRequest,
    responses(
        (status = 201, description = "Unit created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateNamedEntryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let unit = state
        .services
        .catalog
        .create_unit_of_measure(payload.name, payload.description)
        .await
        .map_err(map_service_error)?;

    info!("Unit of measure created: {}", unit.id);
    Ok(created_response(unit))
}

/// List units of measure
#[utoipa::path(
    get,
    path = "/api/v1/units",
    params(ListParams),
    responses(
        (status = 200, description = "Units listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "catalog"
)]
pub async fn list_units(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (units, total) = state
        .services
        .catalog
        .list_units_of_measure(params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        units,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a unit of measure by ID
#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit fetched", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Unit not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let unit = state
        .services
        .catalog
        .get_unit_of_measure(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(unit))
}

/// Update a unit of measure
#[utoipa::path(
    put,
    path = "/api/v1/units/{id}",
    request_body = UpdateNamedEntryRequest,
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Unit not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn update_unit(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedEntryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let unit = state
        .services
        .catalog
        .update_unit_of_measure(id, payload.name, payload.description)
        .await
        .map_err(map_service_error)?;

    info!("Unit of measure updated: {}", id);
    Ok(success_response(unit))
}

/// Toggle the hidden flag on a unit of measure
#[utoipa::path(
    post,
    path = "/api/v1/units/{id}/hide",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Unit not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn hide_unit(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let unit = state
        .services
        .catalog
        .hide_unit_of_measure(id)
        .await
        .map_err(map_service_error)?;

    info!(hidden = unit.is_hidden, "Unit of measure hide toggled: {}", id);
    Ok(success_response(unit))
}

// Product categories

/// Create a product category
#[utoipa::path(
    post,
    path = "/api/v1/product-categories",
    request_body = CreateNamedEntryRequest,
    responses(
        (status = 201, description = "Product category created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_product_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateNamedEntryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let category = state
        .services
        .catalog
        .create_product_category(payload.name, payload.description)
        .await
        .map_err(map_service_error)?;

    info!("Product category created: {}", category.id);
    Ok(created_response(category))
}

/// List product categories
#[utoipa::path(
    get,
    path = "/api/v1/product-categories",
    params(ListParams),
    responses(
        (status = 200, description = "Product categories listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "catalog"
)]
pub async fn list_product_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (categories, total) = state
        .services
        .catalog
        .list_product_categories(params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        categories,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a product category by ID
#[utoipa::path(
    get,
    path = "/api/v1/product-categories/{id}",
    params(("id" = Uuid, Path, description = "Product category ID")),
    responses(
        (status = 200, description = "Product category fetched", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Product category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_product_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .get_product_category(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Update a product category
#[utoipa::path(
    put,
    path = "/api/v1/product-categories/{id}",
    request_body = UpdateNamedEntryRequest,
    params(("id" = Uuid, Path, description = "Product category ID")),
    responses(
        (status = 200, description = "Product category updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Product category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn update_product_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedEntryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let category = state
        .services
        .catalog
        .update_product_category(id, payload.name, payload.description)
        .await
        .map_err(map_service_error)?;

    info!("Product category updated: {}", id);
    Ok(success_response(category))
}

/// Toggle the hidden flag on a product category
#[utoipa::path(
    post,
    path = "/api/v1/product-categories/{id}/hide",
    params(("id" = Uuid, Path, description = "Product category ID")),
    responses(
        (status = 200, description = "Product category hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Product category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn hide_product_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .hide_product_category(id)
        .await
        .map_err(map_service_error)?;

    info!(
        hidden = category.is_hidden,
        "Product category hide toggled: {}", id
    );
    Ok(success_response(category))
}

// Departments

/// Create a department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_department(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateDepartmentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let department = state
        .services
        .catalog
        .create_department(payload.name)
        .await
        .map_err(map_service_error)?;

    info!("Department created: {}", department.id);
    Ok(created_response(department))
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    params(ListParams),
    responses(
        (status = 200, description = "Departments listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "catalog"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (departments, total) = state
        .services
        .catalog
        .list_departments(params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        departments,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a department by ID
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department fetched", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Department not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let department = state
        .services
        .catalog
        .get_department(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(department))
}

/// Update a department
#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}",
    request_body = UpdateDepartmentRequest,
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Department not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn update_department(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let department = state
        .services
        .catalog
        .update_department(id, payload.name)
        .await
        .map_err(map_service_error)?;

    info!("Department updated: {}", id);
    Ok(success_response(department))
}

/// Toggle the hidden flag on a department
#[utoipa::path(
    post,
    path = "/api/v1/departments/{id}/hide",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Department not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn hide_department(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let department = state
        .services
        .catalog
        .hide_department(id)
        .await
        .map_err(map_service_error)?;

    info!(
        hidden = department.is_hidden,
        "Department hide toggled: {}", id
    );
    Ok(success_response(department))
}

// Vendor categories

/// Create a vendor category
#[utoipa::path(
    post,
    path = "/api/v1/vendor-categories",
    request_body = CreateNamedEntryRequest,
    responses(
        (status = 201, description = "Vendor category created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn create_vendor_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateNamedEntryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let category = state
        .services
        .catalog
        .create_vendor_category(payload.name, payload.description)
        .await
        .map_err(map_service_error)?;

    info!("Vendor category created: {}", category.id);
    Ok(created_response(category))
}

/// List vendor categories
#[utoipa::path(
    get,
    path = "/api/v1/vendor-categories",
    params(ListParams),
    responses(
        (status = 200, description = "Vendor categories listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "catalog"
)]
pub async fn list_vendor_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (categories, total) = state
        .services
        .catalog
        .list_vendor_categories(params.include_hidden, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        categories,
        params.page,
        params.per_page,
        total,
    )))
}

/// Get a vendor category by ID
#[utoipa::path(
    get,
    path = "/api/v1/vendor-categories/{id}",
    params(("id" = Uuid, Path, description = "Vendor category ID")),
    responses(
        (status = 200, description = "Vendor category fetched", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_vendor_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .get_vendor_category(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

/// Update a vendor category
#[utoipa::path(
    put,
    path = "/api/v1/vendor-categories/{id}",
    request_body = UpdateNamedEntryRequest,
    params(("id" = Uuid, Path, description = "Vendor category ID")),
    responses(
        (status = 200, description = "Vendor category updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn update_vendor_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedEntryRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let category = state
        .services
        .catalog
        .update_vendor_category(id, payload.name, payload.description)
        .await
        .map_err(map_service_error)?;

    info!("Vendor category updated: {}", id);
    Ok(success_response(category))
}

/// Toggle the hidden flag on a vendor category
#[utoipa::path(
    post,
    path = "/api/v1/vendor-categories/{id}/hide",
    params(("id" = Uuid, Path, description = "Vendor category ID")),
    responses(
        (status = 200, description = "Vendor category hidden flag toggled", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn hide_vendor_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .hide_vendor_category(id)
        .await
        .map_err(map_service_error)?;

    info!(
        hidden = category.is_hidden,
        "Vendor category hide toggled: {}", id
    );
    Ok(success_response(category))
}

// Routers, one per URL prefix. Reads are public; writes sit behind the
// bearer-token middleware.

pub fn unit_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_units))
        .route("/:id", get(get_unit));
    let write = Router::new()
        .route("/", post(create_unit))
        .route("/:id", put(update_unit))
        .route("/:id/hide", post(hide_unit))
        .with_auth();
    read.merge(write)
}

pub fn product_category_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_product_categories))
        .route("/:id", get(get_product_category));
    let write = Router::new()
        .route("/", post(create_product_category))
        .route("/:id", put(update_product_category))
        .route("/:id/hide", post(hide_product_category))
        .with_auth();
    read.merge(write)
}

pub fn department_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_departments))
        .route("/:id", get(get_department));
    let write = Router::new()
        .route("/", post(create_department))
        .route("/:id", put(update_department))
        .route("/:id/hide", post(hide_department))
        .with_auth();
    read.merge(write)
}

pub fn vendor_category_routes() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(list_vendor_categories))
        .route("/:id", get(get_vendor_category));
    let write = Router::new()
        .route("/", post(create_vendor_category))
        .route("/:id", put(update_vendor_category))
        .route("/:id/hide", post(hide_vendor_category))
        .with_auth();
    read.merge(write)
}
