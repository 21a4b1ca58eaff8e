use crate::{
    commands::{ensure_products_exist, Command, DocumentItemInput},
    db::DbPool,
    entities::{
        rfq::Entity as Rfq,
        rfq_vendor_quote, rfq_vendor_quote_item, vendor,
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
    static ref RFQ_QUOTE_RECORDINGS: IntCounter = IntCounter::new(
        "rfq_quote_recordings_total",
        "Total number of vendor quotes recorded against RFQs"
    )
    .expect("metric can be created");
    static ref RFQ_QUOTE_RECORDING_FAILURES: IntCounter = IntCounter::new(
        "rfq_quote_recording_failures_total",
        "Total number of failed RFQ quote recordings"
    )
    .expect("metric can be created");
}

/// Records a vendor's quoted response against an RFQ. The quoting vendor may
/// differ from the vendor the RFQ was addressed to.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordRfqQuoteCommand {
    pub rfq_id: String,
    pub vendor_id: Uuid,
    #[validate]
    pub items: Vec<DocumentItemInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordRfqQuoteResult {
    pub quote_id: Uuid,
    pub rfq_id: String,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for RecordRfqQuoteCommand {
    type Result = RecordRfqQuoteResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            RFQ_QUOTE_RECORDING_FAILURES.inc();
            let msg = format!("Invalid RecordRfqQuoteCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let saved = self.persist(&db_pool).await.map_err(|e| {
            RFQ_QUOTE_RECORDING_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        RFQ_QUOTE_RECORDINGS.inc();

        Ok(RecordRfqQuoteResult {
            quote_id: saved.id,
            rfq_id: saved.rfq_id.clone(),
            item_count: self.items.len(),
            created_at: saved.created_at,
        })
    }
}

impl RecordRfqQuoteCommand {
    async fn persist(&self, db: &DbPool) -> Result<rfq_vendor_quote::Model, ServiceError> {
        let rfq_id = self.rfq_id.clone();
        let vendor_id = self.vendor_id;
        let items = self.items.clone();

        db.transaction::<_, rfq_vendor_quote::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                Rfq::find_by_id(&rfq_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| ServiceError::NotFound(format!("RFQ {} not found", rfq_id)))?;
                vendor::Entity::find_by_id(vendor_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Vendor {} not found", vendor_id))
                    })?;
                ensure_products_exist(txn, &items).await?;

                let now = Utc::now();
                let quote = rfq_vendor_quote::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    rfq_id: Set(rfq_id.clone()),
                    vendor_id: Set(vendor_id),
                    is_hidden: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

                if !items.is_empty() {
                    let rows: Vec<rfq_vendor_quote_item::ActiveModel> = items
                        .iter()
                        .map(|item| rfq_vendor_quote_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            quote_id: Set(quote.id),
                            product_id: Set(item.product_id),
                            description: Set(item.description.clone()),
                            quantity: Set(item.quantity),
                            estimated_unit_price: Set(item.estimated_unit_price),
                            created_at: Set(now),
                        })
                        .collect();
                    rfq_vendor_quote_item::Entity::insert_many(rows)
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
        saved: &rfq_vendor_quote::Model,
    ) -> Result<(), ServiceError> {
        info!(
            rfq_id = %self.rfq_id,
            quote_id = %saved.id,
            vendor_id = %self.vendor_id,
            "Vendor quote recorded against RFQ"
        );

        event_sender
            .send(Event::RfqQuoteRecorded {
                rfq_id: self.rfq_id.clone(),
                quote_id: saved.id,
            })
            .await
            .map_err(|e| {
                RFQ_QUOTE_RECORDING_FAILURES.inc();
                let msg = format!("Failed to send event for recorded quote: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
