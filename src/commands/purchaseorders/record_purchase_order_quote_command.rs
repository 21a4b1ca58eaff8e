use crate::{
    commands::{ensure_products_exist, Command, DocumentItemInput},
    db::DbPool,
    entities::{
        po_vendor_quote, po_vendor_quote_item,
        purchase_order::Entity as PurchaseOrder,
        vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use sea_orm::{
    ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref PO_QUOTE_RECORDINGS: IntCounter = IntCounter::new(
        "purchase_order_quote_recordings_total",
        "Total number of vendor quotes recorded against purchase orders"
    )
    .expect("metric can be created");
    static ref PO_QUOTE_RECORDING_FAILURES: IntCounter = IntCounter::new(
        "purchase_order_quote_recording_failures_total",
        "Total number of failed purchase order quote recordings"
    )
    .expect("metric can be created");
}

/// Records a vendor's quoted response against a purchase order.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordPurchaseOrderQuoteCommand {
    pub purchase_order_id: String,
    pub vendor_id: Uuid,
    #[validate]
    pub items: Vec<DocumentItemInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordPurchaseOrderQuoteResult {
    pub quote_id: Uuid,
    pub purchase_order_id: String,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for RecordPurchaseOrderQuoteCommand {
    type Result = RecordPurchaseOrderQuoteResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PO_QUOTE_RECORDING_FAILURES.inc();
            let msg = format!("Invalid RecordPurchaseOrderQuoteCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let saved = self.persist(&db_pool).await.map_err(|e| {
            PO_QUOTE_RECORDING_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        PO_QUOTE_RECORDINGS.inc();

        Ok(RecordPurchaseOrderQuoteResult {
            quote_id: saved.id,
            purchase_order_id: saved.purchase_order_id.clone(),
            item_count: self.items.len(),
            created_at: saved.created_at,
        })
    }
}

impl RecordPurchaseOrderQuoteCommand {
    async fn persist(&self, db: &DbPool) -> Result<po_vendor_quote::Model, ServiceError> {
        let purchase_order_id = self.purchase_order_id.clone();
        let vendor_id = self.vendor_id;
        let items = self.items.clone();

        db.transaction::<_, po_vendor_quote::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                PurchaseOrder::find_by_id(&purchase_order_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "Purchase order {} not found",
                            purchase_order_id
                        ))
                    })?;
                vendor::Entity::find_by_id(vendor_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Vendor {} not found", vendor_id))
                    })?;
                ensure_products_exist(txn, &items).await?;

                let now = Utc::now();
                let quote = po_vendor_quote::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    purchase_order_id: Set(purchase_order_id.clone()),
                    vendor_id: Set(vendor_id),
                    is_hidden: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

                if !items.is_empty() {
                    let rows: Vec<po_vendor_quote_item::ActiveModel> = items
                        .iter()
                        .map(|item| po_vendor_quote_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            quote_id: Set(quote.id),
                            product_id: Set(item.product_id),
                            description: Set(item.description.clone()),
                            quantity: Set(item.quantity),
                            estimated_unit_price: Set(item.estimated_unit_price),
                            created_at: Set(now),
                        })
                        .collect();
                    po_vendor_quote_item::Entity::insert_many(rows)
                        .exec(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?;
                }

                Ok(quote)
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        saved: &po_vendor_quote::Model,
    ) -> Result<(), ServiceError> {
        info!(
            purchase_order_id = %self.purchase_order_id,
            quote_id = %saved.id,
            vendor_id = %self.vendor_id,
            "Vendor quote recorded against purchase order"
        );

        event_sender
            .send(Event::PurchaseOrderQuoteRecorded {
                purchase_order_id: self.purchase_order_id.clone(),
                quote_id: saved.id,
            })
            .await
            .map_err(|e| {
                PO_QUOTE_RECORDING_FAILURES.inc();
                let msg = format!("Failed to send event for recorded quote: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
