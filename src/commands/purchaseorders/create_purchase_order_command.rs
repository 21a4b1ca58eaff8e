use crate::{
    commands::{ensure_products_exist, Command, DocumentItemInput},
    db::DbPool,
    entities::{purchase_order, purchase_order_item, vendor},
    errors::ServiceError,
    events::{Event, EventSender},
    sequence::{self, DocumentKind},
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
    static ref PO_CREATIONS: IntCounter = IntCounter::new(
        "purchase_order_creations_total",
        "Total number of purchase orders created"
    )
    .expect("metric can be created");
    static ref PO_CREATION_FAILURES: IntCounter = IntCounter::new(
        "purchase_order_creation_failures_total",
        "Total number of failed purchase order creations"
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrderCommand {
    pub vendor_id: Uuid,
    #[validate]
    pub items: Vec<DocumentItemInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePurchaseOrderResult {
    pub id: String,
    pub status: String,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for CreatePurchaseOrderCommand {
    type Result = CreatePurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PO_CREATION_FAILURES.inc();
            let msg = format!("Invalid CreatePurchaseOrderCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let saved = self.persist(&db_pool).await.map_err(|e| {
            PO_CREATION_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        PO_CREATIONS.inc();

        Ok(CreatePurchaseOrderResult {
            id: saved.id.clone(),
            status: saved.status.to_string(),
            item_count: self.items.len(),
            created_at: saved.created_at,
        })
    }
}

impl CreatePurchaseOrderCommand {
    async fn persist(&self, db: &DbPool) -> Result<purchase_order::Model, ServiceError> {
        let vendor_id = self.vendor_id;
        let items = self.items.clone();

        db.transaction::<_, purchase_order::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                vendor::Entity::find_by_id(vendor_id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Vendor {} not found", vendor_id))
                    })?;
                ensure_products_exist(txn, &items).await?;

                let id = sequence::next_document_id(txn, DocumentKind::PurchaseOrder).await?;
                let now = Utc::now();

                let header = purchase_order::ActiveModel {
                    id: Set(id.clone()),
                    vendor_id: Set(vendor_id),
                    status: Set(purchase_order::PurchaseOrderStatus::default()),
                    is_hidden: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

                if !items.is_empty() {
                    let rows: Vec<purchase_order_item::ActiveModel> = items
                        .iter()
                        .map(|item| purchase_order_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            purchase_order_id: Set(id.clone()),
                            product_id: Set(item.product_id),
                            description: Set(item.description.clone()),
                            quantity: Set(item.quantity),
                            estimated_unit_price: Set(item.estimated_unit_price),
                            created_at: Set(now),
                        })
                        .collect();
                    purchase_order_item::Entity::insert_many(rows)
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
        saved: &purchase_order::Model,
    ) -> Result<(), ServiceError> {
        info!(
            purchase_order_id = %saved.id,
            vendor_id = %self.vendor_id,
            item_count = self.items.len(),
            "Purchase order created successfully"
        );

        event_sender
            .send(Event::PurchaseOrderCreated(saved.id.clone()))
            .await
            .map_err(|e| {
                PO_CREATION_FAILURES.inc();
                let msg = format!("Failed to send event for created purchase order: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
