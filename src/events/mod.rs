use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system. Document events carry
// the display number ("PR000001" style) since that is the primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Purchase request events
    PurchaseRequestCreated(String),
    PurchaseRequestUpdated(String),
    PurchaseRequestStatusChanged {
        purchase_request_id: String,
        status: String,
    },
    PurchaseRequestItemsReplaced {
        purchase_request_id: String,
        item_count: usize,
    },

    // RFQ events
    RfqCreated(String),
    RfqUpdated(String),
    RfqStatusChanged {
        rfq_id: String,
        status: String,
    },
    RfqItemsReplaced {
        rfq_id: String,
        item_count: usize,
    },
    RfqSent {
        rfq_id: String,
        vendor_email: String,
    },
    RfqQuoteRecorded {
        rfq_id: String,
        quote_id: Uuid,
    },

    // Purchase order events
    PurchaseOrderCreated(String),
    PurchaseOrderUpdated(String),
    PurchaseOrderStatusChanged {
        purchase_order_id: String,
        status: String,
    },
    PurchaseOrderItemsReplaced {
        purchase_order_id: String,
        item_count: usize,
    },
    PurchaseOrderSent {
        purchase_order_id: String,
        vendor_email: String,
    },
    PurchaseOrderQuoteRecorded {
        purchase_order_id: String,
        quote_id: Uuid,
    },

    // Catalog events
    VendorCreated(Uuid),
    VendorUpdated(Uuid),
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    VendorAnnouncementSent {
        subject: String,
        recipient_count: usize,
    },

    // Tenant and account events
    TenantRegistered {
        tenant_id: Uuid,
        user_id: Uuid,
    },
    EmailVerified(Uuid),
    PasswordResetRequested(Uuid),
    PasswordResetCompleted(Uuid),
}

impl Event {
    /// Short label used for metrics and log correlation
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PurchaseRequestCreated(_) => "purchase_request_created",
            Event::PurchaseRequestUpdated(_) => "purchase_request_updated",
            Event::PurchaseRequestStatusChanged { .. } => "purchase_request_status_changed",
            Event::PurchaseRequestItemsReplaced { .. } => "purchase_request_items_replaced",
            Event::RfqCreated(_) => "rfq_created",
            Event::RfqUpdated(_) => "rfq_updated",
            Event::RfqStatusChanged { .. } => "rfq_status_changed",
            Event::RfqItemsReplaced { .. } => "rfq_items_replaced",
            Event::RfqSent { .. } => "rfq_sent",
            Event::RfqQuoteRecorded { .. } => "rfq_quote_recorded",
            Event::PurchaseOrderCreated(_) => "purchase_order_created",
            Event::PurchaseOrderUpdated(_) => "purchase_order_updated",
            Event::PurchaseOrderStatusChanged { .. } => "purchase_order_status_changed",
            Event::PurchaseOrderItemsReplaced { .. } => "purchase_order_items_replaced",
            Event::PurchaseOrderSent { .. } => "purchase_order_sent",
            Event::PurchaseOrderQuoteRecorded { .. } => "purchase_order_quote_recorded",
            Event::VendorCreated(_) => "vendor_created",
            Event::VendorUpdated(_) => "vendor_updated",
            Event::ProductCreated(_) => "product_created",
            Event::ProductUpdated(_) => "product_updated",
            Event::VendorAnnouncementSent { .. } => "vendor_announcement_sent",
            Event::TenantRegistered { .. } => "tenant_registered",
            Event::EmailVerified(_) => "email_verified",
            Event::PasswordResetRequested(_) => "password_reset_requested",
            Event::PasswordResetCompleted(_) => "password_reset_completed",
        }
    }
}

// Function to process incoming events emitted by services and commands.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        counter!("procura_events.processed", 1, "event" => event.kind());

        match event {
            Event::PurchaseRequestStatusChanged {
                purchase_request_id,
                status,
            } => {
                info!(
                    "Purchase request {} moved to status {}",
                    purchase_request_id, status
                );
            }
            Event::RfqStatusChanged { rfq_id, status } => {
                info!("RFQ {} moved to status {}", rfq_id, status);
            }
            Event::PurchaseOrderStatusChanged {
                purchase_order_id,
                status,
            } => {
                info!(
                    "Purchase order {} moved to status {}",
                    purchase_order_id, status
                );
            }
            Event::RfqSent {
                rfq_id,
                vendor_email,
            } => {
                info!("RFQ {} dispatched to {}", rfq_id, vendor_email);
            }
            Event::PurchaseOrderSent {
                purchase_order_id,
                vendor_email,
            } => {
                info!(
                    "Purchase order {} dispatched to {}",
                    purchase_order_id, vendor_email
                );
            }
            Event::RfqQuoteRecorded { rfq_id, quote_id } => {
                info!("Vendor quote {} recorded against RFQ {}", quote_id, rfq_id);
            }
            Event::PurchaseOrderQuoteRecorded {
                purchase_order_id,
                quote_id,
            } => {
                info!(
                    "Vendor quote {} recorded against purchase order {}",
                    quote_id, purchase_order_id
                );
            }
            Event::VendorAnnouncementSent {
                subject,
                recipient_count,
            } => {
                if recipient_count == 0 {
                    warn!(
                        "Vendor announcement '{}' had no visible vendors to notify",
                        subject
                    );
                } else {
                    info!(
                        "Vendor announcement '{}' sent to {} vendors",
                        subject, recipient_count
                    );
                }
            }
            Event::TenantRegistered { tenant_id, user_id } => {
                info!(
                    "Tenant {} registered by user {}; verification email queued",
                    tenant_id, user_id
                );
            }
            Event::PasswordResetRequested(user_id) => {
                info!("Password reset requested for user {}", user_id);
            }
            other => {
                info!("Event processed: {:?}", other);
            }
        }
    }

    warn!("Event processing loop has ended");
}
