use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        purchase_order::{self, Entity as PurchaseOrder, PurchaseOrderStatus},
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
    static ref PO_UPDATES: IntCounter = IntCounter::new(
        "purchase_order_updates_total",
        "Total number of purchase order updates"
    )
    .expect("metric can be created");
    static ref PO_UPDATE_FAILURES: IntCounter = IntCounter::new(
        "purchase_order_update_failures_total",
        "Total number of failed purchase order updates"
    )
    .expect("metric can be created");
}

/// Updates header fields of a purchase order. Absent fields are left
/// untouched. Status is set directly; there is no transition engine.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePurchaseOrderCommand {
    pub purchase_order_id: String,
    pub vendor_id: Option<Uuid>,
    pub status: Option<PurchaseOrderStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePurchaseOrderResult {
    pub id: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for UpdatePurchaseOrderCommand {
    type Result = UpdatePurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            PO_UPDATE_FAILURES.inc();
            let msg = format!("Invalid UpdatePurchaseOrderCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let db = db_pool.as_ref();

        let (updated, status_changed) = self.apply_update(db).await.map_err(|e| {
            PO_UPDATE_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &updated, status_changed)
            .await?;

        PO_UPDATES.inc();

        Ok(UpdatePurchaseOrderResult {
            id: updated.id.clone(),
            status: updated.status.to_string(),
            updated_at: updated.updated_at,
        })
    }
}

impl UpdatePurchaseOrderCommand {
    async fn apply_update(
        &self,
        db: &DatabaseConnection,
    ) -> Result<(purchase_order::Model, bool), ServiceError> {
        let existing = PurchaseOrder::find_by_id(&self.purchase_order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Purchase order {} not found",
                    self.purchase_order_id
                ))
            })?;

        if let Some(vendor_id) = self.vendor_id {
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

        let mut active: purchase_order::ActiveModel = existing.into();
        if let Some(vendor_id) = self.vendor_id {
            active.vendor_id = Set(vendor_id);
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!("Failed to update purchase order: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        Ok((updated, status_changed))
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        updated: &purchase_order::Model,
        status_changed: bool,
    ) -> Result<(), ServiceError> {
        info!(
            purchase_order_id = %updated.id,
            status = %updated.status,
            "Purchase order updated successfully"
        );

        event_sender
            .send(Event::PurchaseOrderUpdated(updated.id.clone()))
            .await
            .map_err(|e| {
                PO_UPDATE_FAILURES.inc();
                let msg = format!("Failed to send event for updated purchase order: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })?;

        if status_changed {
            event_sender
                .send(Event::PurchaseOrderStatusChanged {
                    purchase_order_id: updated.id.clone(),
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
