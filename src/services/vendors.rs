use crate::{
    db::DbPool,
    entities::{vendor, vendor_category},
    errors::ServiceError,
    events::{Event, EventSender},
    notifications::{self, Mailer, OutboundEmail},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use slog::Logger;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Service for vendor master records and vendor-wide announcements.
#[derive(Clone)]
pub struct VendorService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    mailer: Arc<dyn Mailer>,
    logger: Logger,
}

impl VendorService {
    /// Creates a new vendor service instance
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        mailer: Arc<dyn Mailer>,
        logger: Logger,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            mailer,
            logger,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_vendor(
        &self,
        company_name: String,
        category_id: Option<Uuid>,
        email: String,
        address: Option<String>,
        phone: Option<String>,
    ) -> Result<vendor::Model, ServiceError> {
        let db = &*self.db_pool;

        if let Some(category_id) = category_id {
            vendor_category::Entity::find_by_id(category_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Vendor category {} not found", category_id))
                })?;
        }

        let now = Utc::now();
        let saved = vendor::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_name: Set(company_name),
            category_id: Set(category_id),
            email: Set(email),
            address: Set(address),
            phone: Set(phone),
            is_hidden: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(ServiceError::DatabaseError)?;

        self.event_sender
            .send(Event::VendorCreated(saved.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<vendor::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = vendor::Entity::find();
        if !include_hidden {
            query = query.filter(vendor::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(vendor::Column::IsHidden)
            .order_by_desc(vendor::Column::UpdatedAt)
            .paginate(db, per_page);
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok((rows, total))
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, id: Uuid) -> Result<vendor::Model, ServiceError> {
        let db = &*self.db_pool;
        vendor::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn update_vendor(
        &self,
        id: Uuid,
        company_name: Option<String>,
        category_id: Option<Uuid>,
        email: Option<String>,
        address: Option<String>,
        phone: Option<String>,
    ) -> Result<vendor::Model, ServiceError> {
        let existing = self.get_vendor(id).await?;
        let db = &*self.db_pool;

        if let Some(category_id) = category_id {
            vendor_category::Entity::find_by_id(category_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Vendor category {} not found", category_id))
                })?;
        }

        let mut active: vendor::ActiveModel = existing.into();
        if let Some(company_name) = company_name {
            active.company_name = Set(company_name);
        }
        if let Some(category_id) = category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(address) = address {
            active.address = Set(Some(address));
        }
        if let Some(phone) = phone {
            active.phone = Set(Some(phone));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(ServiceError::DatabaseError)?;

        self.event_sender
            .send(Event::VendorUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    /// Flips the soft-hide flag. Hidden vendors stop receiving announcements
    /// but stay resolvable from existing documents.
    #[instrument(skip(self))]
    pub async fn hide_vendor(&self, id: Uuid) -> Result<vendor::Model, ServiceError> {
        let existing = self.get_vendor(id).await?;
        let db = &*self.db_pool;
        let hidden = !existing.is_hidden;
        let mut active: vendor::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Sends a plain-text announcement to every visible vendor in a single
    /// blind-copy email. Returns the number of addressed vendors; zero means
    /// nothing was sent.
    #[instrument(skip(self, message))]
    pub async fn announce(&self, subject: String, message: String) -> Result<usize, ServiceError> {
        let db = &*self.db_pool;
        let recipients: Vec<String> = vendor::Entity::find()
            .filter(vendor::Column::IsHidden.eq(false))
            .order_by_asc(vendor::Column::CompanyName)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|v| v.email)
            .collect();

        let recipient_count = recipients.len();
        if recipient_count == 0 {
            warn!("Vendor announcement '{}' has no visible recipients", subject);
        } else {
            let email = OutboundEmail::broadcast(recipients, subject.clone(), message);
            notifications::deliver(self.mailer.as_ref(), email).await?;
            info!(
                subject = %subject,
                recipient_count,
                "Vendor announcement sent"
            );
        }

        self.event_sender
            .send(Event::VendorAnnouncementSent {
                subject,
                recipient_count,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(recipient_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::InMemoryMailer;

    fn test_service(mailer: Arc<InMemoryMailer>) -> VendorService {
        let db_pool = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let event_sender = Arc::new(EventSender::new(tx));
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        VendorService::new(db_pool, event_sender, mailer, logger)
    }

    #[tokio::test]
    async fn get_vendor_fails_without_database() {
        let service = test_service(Arc::new(InMemoryMailer::new()));
        let result = service.get_vendor(Uuid::new_v4()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn announce_fails_without_database_before_sending() {
        let mailer = Arc::new(InMemoryMailer::new());
        let service = test_service(mailer.clone());
        let result = service
            .announce("Maintenance window".into(), "Portal down Friday".into())
            .await;
        assert!(result.is_err());
        assert!(mailer.sent().is_empty());
    }
}
