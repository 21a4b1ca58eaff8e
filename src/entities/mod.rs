// Catalog
pub mod department;
pub mod product;
pub mod product_category;
pub mod unit_of_measure;
pub mod vendor;
pub mod vendor_category;

// Procurement documents
pub mod po_vendor_quote;
pub mod po_vendor_quote_item;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod purchase_request;
pub mod purchase_request_item;
pub mod rfq;
pub mod rfq_item;
pub mod rfq_vendor_quote;
pub mod rfq_vendor_quote_item;

// Document numbering
pub mod document_sequence;

// Tenancy and auth
pub mod password_reset_token;
pub mod refresh_token;
pub mod tenant;
pub mod tenant_domain;
pub mod user;
