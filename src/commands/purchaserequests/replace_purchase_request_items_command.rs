use crate::{
    commands::{ensure_products_exist, Command, DocumentItemInput},
    db::DbPool,
    entities::{
        purchase_request::{self, Entity as PurchaseRequest},
        purchase_request_item,
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
    static ref PURCHASE_REQUEST_ITEM_REPLACEMENTS: IntCounter = IntCounter::new(
        "purchase_request_item_replacements_total",
        "Total number of purchase request item replacements"
    )
    .expect("metric can be created");
    static ref PURCHASE_REQUEST_ITEM_REPLACEMENT_FAILURES: IntCounter = IntCounter::new(
        "purchase_request_item_replacement_failures_total",
        "Total number of failed purchase request item replacements"
    )
    .expect("metric can be created");
}

/// Replaces the full item set of a purchase request. An empty list clears
/// the document; totals then derive to zero.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReplacePurchaseRequestItemsCommand {
    pub purchase_request_id: String,
    #[validate]
    pub items: Vec<DocumentItemInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplacePurchaseRequestItemsResult {
    pub id: String,
    pub item_count: usize,
}

#[async_trait::async_trait]
impl Command for ReplacePurchaseRequestItemsCommand {
    type Result = ReplacePurchaseRequestItemsResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PURCHASE_REQUEST_ITEM_REPLACEMENT_FAILURES.inc();
            let msg = format!("Invalid ReplacePurchaseRequestItemsCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        self.replace_items(&db_pool).await.map_err(|e| {
            PURCHASE_REQUEST_ITEM_REPLACEMENT_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender).await?;

        PURCHASE_REQUEST_ITEM_REPLACEMENTS.inc();

        Ok(ReplacePurchaseRequestItemsResult {
            id: self.purchase_request_id.clone(),
            item_count: self.items.len(),
        })
    }
}

impl ReplacePurchaseRequestItemsCommand {
    async fn replace_items(&self, db: &DbPool) -> Result<(), ServiceError> {
        let purchase_request_id = self.purchase_request_id.clone();
        let items = self.items.clone();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let existing = PurchaseRequest::find_by_id(&purchase_request_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "Purchase request {} not found",
                            purchase_request_id
                        ))
                    })?;

                ensure_products_exist(txn, &items).await?;

                purchase_request_item::Entity::delete_many()
                    .filter(
                        purchase_request_item::Column::PurchaseRequestId
                            .eq(purchase_request_id.clone()),
                    )
                    .exec(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;

                let now = Utc::now();
                if !items.is_empty() {
                    let rows: Vec<purchase_request_item::ActiveModel> = items
                        .iter()
                        .map(|item| purchase_request_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            purchase_request_id: Set(purchase_request_id.clone()),
                            product_id: Set(item.product_id),
                            description: Set(item.description.clone()),
                            quantity: Set(item.quantity),
                            estimated_unit_price: Set(item.estimated_unit_price),
                            created_at: Set(now),
                        })
                        .collect();
                    purchase_request_item::Entity::insert_many(rows)
                        .exec(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?;
                }

                let mut header: purchase_request::ActiveModel = existing.into();
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
            purchase_request_id = %self.purchase_request_id,
            item_count = self.items.len(),
            "Purchase request items replaced"
        );

        event_sender
            .send(Event::PurchaseRequestItemsReplaced {
                purchase_request_id: self.purchase_request_id.clone(),
                item_count: self.items.len(),
            })
            .await
            .map_err(|e| {
                PURCHASE_REQUEST_ITEM_REPLACEMENT_FAILURES.inc();
                let msg = format!("Failed to send event for replaced items: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
