use crate::{
    commands::{ensure_products_exist, Command, DocumentItemInput},
    db::DbPool,
    entities::{rfq, rfq_item, vendor},
    errors::ServiceError,
    events::{Event, EventSender},
    sequence::{self, DocumentKind},
};
use chrono::{DateTime, NaiveDate, Utc};
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
    static ref RFQ_CREATIONS: IntCounter = IntCounter::new(
        "rfq_creations_total",
        "Total number of RFQs created"
    )
    .expect("metric can be created");
    static ref RFQ_CREATION_FAILURES: IntCounter = IntCounter::new(
        "rfq_creation_failures_total",
        "Total number of failed RFQ creations"
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateRfqCommand {
    pub vendor_id: Uuid,
    pub expiry_date: Option<NaiveDate>,
    #[validate]
    pub items: Vec<DocumentItemInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRfqResult {
    pub id: String,
    pub status: String,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for CreateRfqCommand {
    type Result = CreateRfqResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            RFQ_CREATION_FAILURES.inc();
            let msg = format!("Invalid CreateRfqCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let saved = self.persist(&db_pool).await.map_err(|e| {
            RFQ_CREATION_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        RFQ_CREATIONS.inc();

        Ok(CreateRfqResult {
            id: saved.id.clone(),
            status: saved.status.to_string(),
            item_count: self.items.len(),
            created_at: saved.created_at,
        })
    }
}

impl CreateRfqCommand {
    async fn persist(&self, db: &DbPool) -> Result<rfq::Model, ServiceError> {
        let vendor_id = self.vendor_id;
        let expiry_date = self.expiry_date;
        let items = self.items.clone();

        db.transaction::<_, rfq::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                vendor::Entity::find_by_id(vendor_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Vendor {} not found", vendor_id))
                    })?;
                ensure_products_exist(txn, &items).await?;

                let id = sequence::next_document_id(txn, DocumentKind::Rfq).await?;
                let now = Utc::now();

                let header = rfq::ActiveModel {
                    id: Set(id.clone()),
                    vendor_id: Set(vendor_id),
                    status: Set(rfq::RfqStatus::default()),
                    expiry_date: Set(expiry_date),
                    is_hidden: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

                if !items.is_empty() {
                    let rows: Vec<rfq_item::ActiveModel> = items
                        .iter()
                        .map(|item| rfq_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            rfq_id: Set(id.clone()),
                            product_id: Set(item.product_id),
                            description: Set(item.description.clone()),
                            quantity: Set(item.quantity),
                            estimated_unit_price: Set(item.estimated_unit_price),
                            created_at: Set(now),
                        })
                        .collect();
                    rfq_item::Entity::insert_many(rows)
                        .exec(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?;
                }

                Ok(header)
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
        saved: &rfq::Model,
    ) -> Result<(), ServiceError> {
        info!(
            rfq_id = %saved.id,
            vendor_id = %self.vendor_id,
            item_count = self.items.len(),
            "RFQ created successfully"
        );

        event_sender
            .send(Event::RfqCreated(saved.id.clone()))
            .await
            .map_err(|e| {
                RFQ_CREATION_FAILURES.inc();
                let msg = format!("Failed to send event for created RFQ: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
