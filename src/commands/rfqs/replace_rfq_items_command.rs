use crate::{
    commands::{ensure_products_exist, Command, DocumentItemInput},
    db::DbPool,
    entities::{
        rfq::{self, Entity as Rfq},
        rfq_item,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref RFQ_ITEM_REPLACEMENTS: IntCounter = IntCounter::new(
        "rfq_item_replacements_total",
        "Total number of RFQ item replacements"
    )
    .expect("metric can be created");
    static ref RFQ_ITEM_REPLACEMENT_FAILURES: IntCounter = IntCounter::new(
        "rfq_item_replacement_failures_total",
        "Total number of failed RFQ item replacements"
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReplaceRfqItemsCommand {
    pub rfq_id: String,
    #[validate]
    pub items: Vec<DocumentItemInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaceRfqItemsResult {
    pub id: String,
    pub item_count: usize,
}

#[async_trait::async_trait]
impl Command for ReplaceRfqItemsCommand {
    type Result = ReplaceRfqItemsResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            RFQ_ITEM_REPLACEMENT_FAILURES.inc();
            let msg = format!("Invalid ReplaceRfqItemsCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        self.replace_items(&db_pool).await.map_err(|e| {
            RFQ_ITEM_REPLACEMENT_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender).await?;

        RFQ_ITEM_REPLACEMENTS.inc();

        Ok(ReplaceRfqItemsResult {
            id: self.rfq_id.clone(),
            item_count: self.items.len(),
        })
    }
}

impl ReplaceRfqItemsCommand {
    async fn replace_items(&self, db: &DbPool) -> Result<(), ServiceError> {
        let rfq_id = self.rfq_id.clone();
        let items = self.items.clone();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let existing = Rfq::find_by_id(&rfq_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| ServiceError::NotFound(format!("RFQ {} not found", rfq_id)))?;

                ensure_products_exist(txn, &items).await?;

                rfq_item::Entity::delete_many()
                    .filter(rfq_item::Column::RfqId.eq(rfq_id.clone()))
                    .exec(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                let now = Utc::now();
                if !items.is_empty() {
                    let rows: Vec<rfq_item::ActiveModel> = items
                        .iter()
                        .map(|item| rfq_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            rfq_id: Set(rfq_id.clone()),
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

                let mut header: rfq::ActiveModel = existing.into();
                header.updated_at = Set(now);
                header
                    .update(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }

    async fn log_and_trigger_event(&self, event_sender: &EventSender) -> Result<(), ServiceError> {
        info!(
            rfq_id = %self.rfq_id,
            item_count = self.items.len(),
            "RFQ items replaced"
        );

        event_sender
            .send(Event::RfqItemsReplaced {
                rfq_id: self.rfq_id.clone(),
                item_count: self.items.len(),
            })
            .await
            .map_err(|e| {
                RFQ_ITEM_REPLACEMENT_FAILURES.inc();
                let msg = format!("Failed to send event for replaced items: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
