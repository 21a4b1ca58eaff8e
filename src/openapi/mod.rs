use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Procura API",
        version = "1.0.0",
        description = r#"
# Procura Procurement API

A multi-tenant backend for the purchasing cycle: purchase requests, requests
for quotation, vendor quotes, and purchase orders, backed by a vendor and
product catalog.

## Features

- **Catalog**: Units of measure, product categories, departments, vendor categories
- **Vendors & Products**: Vendor directory with mass announcements, product definitions with pricing
- **Purchase Requests**: Departmental requests with line items and derived totals
- **RFQs**: Requests for quotation emailed to vendors, with recorded vendor quotes
- **Purchase Orders**: Orders emailed to vendors, with recorded vendor quotes
- **Tenants**: Self-service registration, email verification, login, password reset

## Authentication

Write endpoints require a JWT bearer token obtained from the login endpoint.
Reads and the tenant registration/verification/login flows are public:

```
Authorization: Bearer <your-jwt-token>
```

## Error Handling

The API uses consistent error response formats with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "request_id": "2c9b3f0e",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints support pagination with the following query parameters:
- `page`: Page number (default: 1)
- `per_page`: Items per page (default: 20)
- `include_hidden`: Include soft-hidden rows (default: false)
- `status`: Filter documents by a single status value
        "#,
        contact(
            name = "Procura Support",
            email = "support@procura.dev",
            url = "https://procura.dev"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "https://api.procura.dev/v1", description = "Production server"),
        (url = "http://localhost:8080/api/v1", description = "Local development")
    ),
    tags(
        (name = "tenants", description = "Tenant registration and authentication"),
        (name = "catalog", description = "Units, categories, and departments"),
        (name = "vendors", description = "Vendor directory and announcements"),
        (name = "products", description = "Product definitions"),
        (name = "purchase-requests", description = "Purchase request documents"),
        (name = "rfqs", description = "Requests for quotation and vendor quotes"),
        (name = "purchase-orders", description = "Purchase orders and vendor quotes")
    ),
    paths(
        // Tenants
        crate::handlers::tenants::register,
        crate::handlers::tenants::verify_email,
        crate::handlers::tenants::resend_verification,
        crate::handlers::tenants::login,
        crate::handlers::tenants::refresh_token,
        crate::handlers::tenants::logout,
        crate::handlers::tenants::request_password_reset,
        crate::handlers::tenants::check_password_reset,
        crate::handlers::tenants::confirm_password_reset,

        // Catalog
        crate::handlers::catalog::create_unit,
        crate::handlers::catalog::list_units,
        crate::handlers::catalog::get_unit,
        crate::handlers::catalog::update_unit,
        crate::handlers::catalog::hide_unit,
        crate::handlers::catalog::create_product_category,
        crate::handlers::catalog::list_product_categories,
        crate::handlers::catalog::get_product_category,
        crate::handlers::catalog::update_product_category,
        crate::handlers::catalog::hide_product_category,
        crate::handlers::catalog::create_department,
        crate::handlers::catalog::list_departments,
        crate::handlers::catalog::get_department,
        crate::handlers::catalog::update_department,
        crate::handlers::catalog::hide_department,
        crate::handlers::catalog::create_vendor_category,
        crate::handlers::catalog::list_vendor_categories,
        crate::handlers::catalog::get_vendor_category,
        crate::handlers::catalog::update_vendor_category,
        crate::handlers::catalog::hide_vendor_category,

        // Vendors
        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::list_vendors,
        crate::handlers::vendors::get_vendor,
        crate::handlers::vendors::update_vendor,
        crate::handlers::vendors::hide_vendor,
        crate::handlers::vendors::announce,

        // Products
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::hide_product,

        // Purchase requests
        crate::handlers::purchase_requests::create_purchase_request,
        crate::handlers::purchase_requests::list_purchase_requests,
        crate::handlers::purchase_requests::get_purchase_request,
        crate::handlers::purchase_requests::update_purchase_request,
        crate::handlers::purchase_requests::replace_purchase_request_items,
        crate::handlers::purchase_requests::hide_purchase_request,

        // RFQs
        crate::handlers::rfqs::create_rfq,
        crate::handlers::rfqs::list_rfqs,
        crate::handlers::rfqs::get_rfq,
        crate::handlers::rfqs::update_rfq,
        crate::handlers::rfqs::replace_rfq_items,
        crate::handlers::rfqs::hide_rfq,
        crate::handlers::rfqs::send_rfq,
        crate::handlers::rfqs::record_rfq_quote,
        crate::handlers::rfqs::list_rfq_quotes,
        crate::handlers::rfqs::get_rfq_quote,

        // Purchase orders
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::replace_purchase_order_items,
        crate::handlers::purchase_orders::hide_purchase_order,
        crate::handlers::purchase_orders::send_purchase_order,
        crate::handlers::purchase_orders::record_purchase_order_quote,
        crate::handlers::purchase_orders::list_purchase_order_quotes,
        crate::handlers::purchase_orders::get_purchase_order_quote,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::DocumentItemRequest,
            crate::handlers::common::DocumentItemView,
            crate::handlers::common::PaginationMeta,

            // Tenant types
            crate::handlers::tenants::RegisterRequest,
            crate::handlers::tenants::ResendVerificationRequest,
            crate::handlers::tenants::LoginRequest,
            crate::handlers::tenants::RefreshTokenRequest,
            crate::handlers::tenants::PasswordResetRequest,
            crate::handlers::tenants::PasswordResetConfirmRequest,

            // Catalog types
            crate::handlers::catalog::CreateNamedEntryRequest,
            crate::handlers::catalog::UpdateNamedEntryRequest,
            crate::handlers::catalog::CreateDepartmentRequest,
            crate::handlers::catalog::UpdateDepartmentRequest,

            // Vendor types
            crate::handlers::vendors::CreateVendorRequest,
            crate::handlers::vendors::UpdateVendorRequest,
            crate::handlers::vendors::AnnounceRequest,

            // Product types
            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::UpdateProductRequest,

            // Document types
            crate::handlers::purchase_requests::CreatePurchaseRequestRequest,
            crate::handlers::purchase_requests::UpdatePurchaseRequestRequest,
            crate::handlers::purchase_requests::ReplaceItemsRequest,
            crate::handlers::rfqs::CreateRfqRequest,
            crate::handlers::rfqs::UpdateRfqRequest,
            crate::handlers::rfqs::RecordQuoteRequest,
            crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
            crate::handlers::purchase_orders::UpdatePurchaseOrderRequest,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_core_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Procura API"));
        assert!(json.contains("/api/v1/purchase-requests"));
        assert!(json.contains("/api/v1/rfqs/{id}/send"));
        assert!(json.contains("/api/v1/tenants/register"));
    }
}
