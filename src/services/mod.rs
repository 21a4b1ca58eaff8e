// Catalog reference data
pub mod catalog;
pub mod products;
pub mod vendors;

// Procurement documents
pub mod purchase_orders;
pub mod purchase_requests;
pub mod rfqs;

// Tenancy and accounts
pub mod tenants;
