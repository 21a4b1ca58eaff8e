use crate::commands::DocumentItemInput;
use crate::errors::{ApiError, ServiceError};
use crate::money;
use crate::ApiResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Standard success response under the API envelope
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// Standard created response under the API envelope
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::success(data))).into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Parse a status query/body string into its enum, rejecting unknown values
pub fn parse_status<T: std::str::FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|_| ApiError::ValidationError(format!("Unknown status: {}", raw)))
}

/// Query parameters for catalog list endpoints
#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Include soft-hidden records
    #[serde(default)]
    pub include_hidden: bool,
}

/// Query parameters for document list endpoints
#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct DocumentListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Include soft-hidden records
    #[serde(default)]
    pub include_hidden: bool,
    /// Restrict the listing to one status
    pub status: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

/// Standard pagination response metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if total == 0 || per_page == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Standard paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, per_page, total),
        }
    }
}

/// A document line item as accepted by create/replace endpoints. The unit
/// price bounds (non-negative, at most two decimal places) are enforced by
/// the command layer.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct DocumentItemRequest {
    pub product_id: Uuid,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub estimated_unit_price: Decimal,
}

impl From<DocumentItemRequest> for DocumentItemInput {
    fn from(req: DocumentItemRequest) -> Self {
        Self {
            product_id: req.product_id,
            description: req.description,
            quantity: req.quantity,
            estimated_unit_price: req.estimated_unit_price,
        }
    }
}

/// A document line item as returned by retrieve endpoints, with its derived
/// line total.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub description: Option<String>,
    pub quantity: i32,
    pub estimated_unit_price: Decimal,
    pub line_total: Decimal,
}

impl DocumentItemView {
    pub fn new(
        id: Uuid,
        product_id: Uuid,
        description: Option<String>,
        quantity: i32,
        estimated_unit_price: Decimal,
    ) -> Self {
        let line_total = money::line_total(quantity, estimated_unit_price);
        Self {
            id,
            product_id,
            description,
            quantity,
            estimated_unit_price,
            line_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pagination_meta_rounds_total_pages_up() {
        let meta = PaginationMeta::new(1, 20, 41);
        assert_eq!(meta.total_pages, 3);

        let empty = PaginationMeta::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn item_view_derives_its_line_total() {
        let view = DocumentItemView::new(Uuid::new_v4(), Uuid::new_v4(), None, 3, dec!(10.00));
        assert_eq!(view.line_total, dec!(30.00));
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let result: Result<crate::entities::rfq::RfqStatus, _> = parse_status("bogus");
        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }
}
