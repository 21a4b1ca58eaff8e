use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        rfq::{self, Entity as Rfq, RfqStatus},
        vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref RFQ_UPDATES: IntCounter = IntCounter::new(
        "rfq_updates_total",
        "Total number of RFQ updates"
    )
    .expect("metric can be created");
    static ref RFQ_UPDATE_FAILURES: IntCounter = IntCounter::new(
        "rfq_update_failures_total",
        "Total number of failed RFQ updates"
    )
    .expect("metric can be created");
}

/// Updates header fields of an RFQ. Absent fields are left untouched.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateRfqCommand {
    pub rfq_id: String,
    pub vendor_id: Option<Uuid>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<RfqStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRfqResult {
    pub id: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for UpdateRfqCommand {
    type Result = UpdateRfqResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            RFQ_UPDATE_FAILURES.inc();
            let msg = format!("Invalid UpdateRfqCommand: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let db = db_pool.as_ref();

        let (updated, status_changed) = self.apply_update(db).await.map_err(|e| {
            RFQ_UPDATE_FAILURES.inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &updated, status_changed)
            .await?;

        RFQ_UPDATES.inc();

        Ok(UpdateRfqResult {
            id: updated.id.clone(),
            status: updated.status.to_string(),
            updated_at: updated.updated_at,
        })
    }
}

impl UpdateRfqCommand {
    async fn apply_update(
        &self,
        db: &DatabaseConnection,
    ) -> Result<(rfq::Model, bool), ServiceError> {
        let existing = Rfq::find_by_id(&self.rfq_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("RFQ {} not found", self.rfq_id)))?;

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

        let mut active: rfq::ActiveModel = existing.into();
        if let Some(vendor_id) = self.vendor_id {
            active.vendor_id = Set(vendor_id);
        }
        if let Some(expiry_date) = self.expiry_date {
            active.expiry_date = Set(Some(expiry_date));
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!("Failed to update RFQ: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        Ok((updated, status_changed))
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        updated: &rfq::Model,
        status_changed: bool,
    ) -> Result<(), ServiceError> {
        info!(
            rfq_id = %updated.id,
            status = %updated.status,
            "RFQ updated successfully"
        );

        event_sender
            .send(Event::RfqUpdated(updated.id.clone()))
            .await
            .map_err(|e| {
                RFQ_UPDATE_FAILURES.inc();
                let msg = format!("Failed to send event for updated RFQ: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })?;

        if status_changed {
            event_sender
                .send(Event::RfqStatusChanged {
                    rfq_id: updated.id.clone(),
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
