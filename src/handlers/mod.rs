pub mod catalog;
pub mod common;
pub mod products;
pub mod purchase_orders;
pub mod purchase_requests;
pub mod rfqs;
pub mod tenants;
pub mod vendors;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::logging::component_logger;
use crate::notifications::Mailer;
use slog::Logger;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub vendors: Arc<crate::services::vendors::VendorService>,
    pub products: Arc<crate::services::products::ProductService>,
    pub purchase_requests: Arc<crate::services::purchase_requests::PurchaseRequestService>,
    pub rfqs: Arc<crate::services::rfqs::RfqService>,
    pub purchase_orders: Arc<crate::services::purchase_orders::PurchaseOrderService>,
    pub tenants: Arc<crate::services::tenants::TenantService>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    /// Build the AppServices container used by the HTTP layer.
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        auth_service: Arc<AuthService>,
        mailer: Arc<dyn Mailer>,
        config: Arc<AppConfig>,
        base_logger: Logger,
    ) -> Self {
        let catalog_logger = component_logger(&base_logger, "catalog_service");
        let vendors_logger = component_logger(&base_logger, "vendor_service");
        let products_logger = component_logger(&base_logger, "product_service");
        let purchase_requests_logger = component_logger(&base_logger, "purchase_request_service");
        let rfqs_logger = component_logger(&base_logger, "rfq_service");
        let purchase_orders_logger = component_logger(&base_logger, "purchase_order_service");
        let tenants_logger = component_logger(&base_logger, "tenant_service");

        let catalog = Arc::new(crate::services::catalog::CatalogService::new(
            db_pool.clone(),
            catalog_logger,
        ));
        let vendors = Arc::new(crate::services::vendors::VendorService::new(
            db_pool.clone(),
            event_sender.clone(),
            mailer.clone(),
            vendors_logger,
        ));
        let products = Arc::new(crate::services::products::ProductService::new(
            db_pool.clone(),
            event_sender.clone(),
            products_logger,
        ));
        let purchase_requests = Arc::new(
            crate::services::purchase_requests::PurchaseRequestService::new(
                db_pool.clone(),
                event_sender.clone(),
                purchase_requests_logger,
            ),
        );
        let rfqs = Arc::new(crate::services::rfqs::RfqService::new(
            db_pool.clone(),
            event_sender.clone(),
            mailer.clone(),
            rfqs_logger,
        ));
        let purchase_orders = Arc::new(crate::services::purchase_orders::PurchaseOrderService::new(
            db_pool.clone(),
            event_sender.clone(),
            mailer.clone(),
            purchase_orders_logger,
        ));
        let tenants = Arc::new(crate::services::tenants::TenantService::new(
            db_pool,
            event_sender,
            auth_service.clone(),
            mailer,
            config,
            tenants_logger,
        ));

        Self {
            catalog,
            vendors,
            products,
            purchase_requests,
            rfqs,
            purchase_orders,
            tenants,
            auth: auth_service,
        }
    }
}

// Note: AppState is defined in lib.rs
