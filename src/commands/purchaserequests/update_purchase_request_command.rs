use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        department,
        purchase_request::{self, Entity as PurchaseRequest, PurchaseRequestStatus},
        vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref PURCHASE_REQUEST_UPDATES: IntCounter = IntCounter::new(
        "purchase_request_updates_total",
        "Total number of purchase request updates"
    )
    .expect("metric can be created");
    static ref PURCHASE_REQUEST_UPDATE_FAILURES: IntCounter = IntCounter::new(
        "purchase_request_update_failures_total",
        "Total number of failed purchase request updates"
    )
    .expect("metric can be created");
}

/// Updates header fields of a purchase request. Absent fields are left
/// untouched. Status is set directly; there is no transition engine.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePurchaseRequestCommand {
    pub purchase_request_id: String,
    pub department_id: Option<Uuid>,
    #[validate(length(max = 1000))]
    pub purpose: Option<String>,
    pub suggested_vendor_id: Option<Uuid>,
    pub status: Option<PurchaseRequestStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePurchaseRequestResult {
    pub id: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for UpdatePurchaseRequestCommand {
    type Result = UpdatePurchaseRequestResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PURCHASE_REQUEST_UPDATE_FAILURES.inc();
            let msg = format!("Invalid UpdatePurchaseRequestCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let db = db_pool.as_ref();

        let (updated, status_changed) = self.apply_update(db).await.map_err(|e| {
            PURCHASE_REQUEST_UPDATE_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &updated, status_changed)
            .await?;

        PURCHASE_REQUEST_UPDATES.inc();

        Ok(UpdatePurchaseRequestResult {
            id: updated.id.clone(),
            status: updated.status.to_string(),
            updated_at: updated.updated_at,
        })
    }
}

impl UpdatePurchaseRequestCommand {
    async fn apply_update(
        &self,
        db: &DatabaseConnection,
    ) -> Result<(purchase_request::Model, bool), ServiceError> {
        let existing = PurchaseRequest::find_by_id(&self.purchase_request_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Purchase request {} not found",
                    self.purchase_request_id
                ))
            })?;

        if let Some(department_id) = self.department_id {
            department::Entity::find_by_id(department_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Department {} not found", department_id))
                })?;
        }
        if let Some(vendor_id) = self.suggested_vendor_id {
            vendor::Entity::find_by_id(vendor_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_id)))?;
        }

        let status_changed = self
            .status
            .map(|status| status != existing.status)
            .unwrap_or(false);

        let mut active: purchase_request::ActiveModel = existing.into();
        if let Some(department_id) = self.department_id {
            active.department_id = Set(Some(department_id));
        }
        if let Some(purpose) = &self.purpose {
            active.purpose = Set(Some(purpose.clone()));
        }
        if let Some(vendor_id) = self.suggested_vendor_id {
            active.suggested_vendor_id = Set(Some(vendor_id));
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!("Failed to update purchase request: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        Ok((updated, status_changed))
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        updated: &purchase_request::Model,
        status_changed: bool,
    ) -> Result<(), ServiceError> {
        info!(
            purchase_request_id = %updated.id,
            status = %updated.status,
            "Purchase request updated successfully"
        );

        event_sender
            .send(Event::PurchaseRequestUpdated(updated.id.clone()))
            .await
            .map_err(|e| {
                PURCHASE_REQUEST_UPDATE_FAILURES.inc();
                let msg = format!("Failed to send event for updated purchase request: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })?;

        if status_changed {
            event_sender
                .send(Event::PurchaseRequestStatusChanged {
                    purchase_request_id: updated.id.clone(),
                    status: updated.status.to_string(),
                })
                .await
                .map_err(|e| {
                    let msg = format!("Failed to send status change event: {}", e);
                    error!("{}", msg);
                    ServiceError::EventError(msg)
                })?;
        }

        Ok(())
    }
}
