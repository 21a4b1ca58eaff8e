use crate::{
    commands::{ensure_products_exist, Command, DocumentItemInput},
    db::DbPool,
    entities::{department, purchase_request, purchase_request_item, vendor},
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
    static ref PURCHASE_REQUEST_CREATIONS: IntCounter = IntCounter::new(
        "purchase_request_creations_total",
        "Total number of purchase requests created"
    )
    .expect("metric can be created");
    static ref PURCHASE_REQUEST_CREATION_FAILURES: IntCounter = IntCounter::new(
        "purchase_request_creation_failures_total",
        "Total number of failed purchase request creations"
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseRequestCommand {
    pub requester_id: Uuid,
    pub department_id: Option<Uuid>,
    #[validate(length(max = 1000))]
    pub purpose: Option<String>,
    pub suggested_vendor_id: Option<Uuid>,
    #[validate]
    pub items: Vec<DocumentItemInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePurchaseRequestResult {
    pub id: String,
    pub status: String,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for CreatePurchaseRequestCommand {
    type Result = CreatePurchaseRequestResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PURCHASE_REQUEST_CREATION_FAILURES.inc();
            let msg = format!("Invalid CreatePurchaseRequestCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let saved = self.persist(&db_pool).await.map_err(|e| {
            PURCHASE_REQUEST_CREATION_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        PURCHASE_REQUEST_CREATIONS.inc();

        Ok(CreatePurchaseRequestResult {
            id: saved.id.clone(),
            status: saved.status.to_string(),
            item_count: self.items.len(),
            created_at: saved.created_at,
        })
    }
}

impl CreatePurchaseRequestCommand {
    async fn persist(&self, db: &DbPool) -> Result<purchase_request::Model, ServiceError> {
        let requester_id = self.requester_id;
        let department_id = self.department_id;
        let purpose = self.purpose.clone();
        let suggested_vendor_id = self.suggested_vendor_id;
        let items = self.items.clone();

        db.transaction::<_, purchase_request::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                if let Some(department_id) = department_id {
                    department::Entity::find_by_id(department_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Department {} not found",
                                department_id
                            ))
                        })?;
                }
                if let Some(vendor_id) = suggested_vendor_id {
                    vendor::Entity::find_by_id(vendor_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::DatabaseError)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Vendor {} not found", vendor_id))
                        })?;
                }
                ensure_products_exist(txn, &items).await?;

                let id = sequence::next_document_id(txn, DocumentKind::PurchaseRequest).await?;
                let now = Utc::now();

                let header = purchase_request::ActiveModel {
                    id: Set(id.clone()),
                    requester_id: Set(requester_id),
                    department_id: Set(department_id),
                    status: Set(purchase_request::PurchaseRequestStatus::default()),
                    purpose: Set(purpose),
                    suggested_vendor_id: Set(suggested_vendor_id),
                    is_hidden: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(ServiceError::DatabaseError)?;

                if !items.is_empty() {
                    let rows: Vec<purchase_request_item::ActiveModel> = items
                        .iter()
                        .map(|item| purchase_request_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            purchase_request_id: Set(id.clone()),
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
        saved: &purchase_request::Model,
    ) -> Result<(), ServiceError> {
        info!(
            purchase_request_id = %saved.id,
            requester_id = %self.requester_id,
            item_count = self.items.len(),
            "Purchase request created successfully"
        );

        event_sender
            .send(Event::PurchaseRequestCreated(saved.id.clone()))
            .await
            .map_err(|e| {
                PURCHASE_REQUEST_CREATION_FAILURES.inc();
                let msg = format!("Failed to send event for created purchase request: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
