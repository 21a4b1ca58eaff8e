use crate::{
    commands::purchaserequests::{
        CreatePurchaseRequestCommand, ReplacePurchaseRequestItemsCommand,
        UpdatePurchaseRequestCommand,
    },
    commands::Command,
    db::DbPool,
    entities::purchase_request::{self, Entity as PurchaseRequest, PurchaseRequestStatus},
    entities::purchase_request_item,
    errors::ServiceError,
    events::EventSender,
    metrics::BUSINESS_METRICS,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;

/// Service for purchase requests. Writes are delegated to commands; reads
/// and the soft-hide flip query the database directly.
#[derive(Clone)]
pub struct PurchaseRequestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl PurchaseRequestService {
    /// Creates a new purchase request service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    /// Creates a purchase request with its items and returns the stored
    /// document. The display number is allocated inside the insert
    /// transaction.
    #[instrument(skip(self))]
    pub async fn create_purchase_request(
        &self,
        command: CreatePurchaseRequestCommand,
    ) -> Result<(purchase_request::Model, Vec<purchase_request_item::Model>), ServiceError> {
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        BUSINESS_METRICS.purchase_requests_created.inc();
        self.get_purchase_request(&result.id).await
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_requests(
        &self,
        status: Option<PurchaseRequestStatus>,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_request::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = PurchaseRequest::find();
        if let Some(status) = status {
            query = query.filter(purchase_request::Column::Status.eq(status));
        }
        if !include_hidden {
            query = query.filter(purchase_request::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(purchase_request::Column::IsHidden)
            .order_by_desc(purchase_request::Column::UpdatedAt)
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
    pub async fn get_purchase_request(
        &self,
        id: &str,
    ) -> Result<(purchase_request::Model, Vec<purchase_request_item::Model>), ServiceError> {
        let db = &*self.db_pool;
        let header = PurchaseRequest::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase request {} not found", id)))?;
        let items = header
            .find_related(purchase_request_item::Entity)
            .order_by_asc(purchase_request_item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok((header, items))
    }

    #[instrument(skip(self))]
    pub async fn update_purchase_request(
        &self,
        command: UpdatePurchaseRequestCommand,
    ) -> Result<(purchase_request::Model, Vec<purchase_request_item::Model>), ServiceError> {
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        self.get_purchase_request(&result.id).await
    }

    #[instrument(skip(self))]
    pub async fn replace_purchase_request_items(
        &self,
        command: ReplacePurchaseRequestItemsCommand,
    ) -> Result<(purchase_request::Model, Vec<purchase_request_item::Model>), ServiceError> {
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        self.get_purchase_request(&result.id).await
    }

    /// Flips the soft-hide flag and returns the updated header.
    #[instrument(skip(self))]
    pub async fn hide_purchase_request(
        &self,
        id: &str,
    ) -> Result<purchase_request::Model, ServiceError> {
        let (header, _) = self.get_purchase_request(id).await?;
        let db = &*self.db_pool;
        let hidden = !header.is_hidden;
        let mut active: purchase_request::ActiveModel = header.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> PurchaseRequestService {
        let db_pool = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let event_sender = Arc::new(EventSender::new(tx));
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        PurchaseRequestService::new(db_pool, event_sender, logger)
    }

    #[tokio::test]
    async fn create_purchase_request_fails_without_database() {
        let service = test_service();
        let command = CreatePurchaseRequestCommand {
            requester_id: uuid::Uuid::new_v4(),
            department_id: None,
            purpose: Some("Replacement monitors".to_string()),
            suggested_vendor_id: None,
            items: vec![],
        };
        let result = service.create_purchase_request(command).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn get_purchase_request_fails_without_database() {
        let service = test_service();
        let result = service.get_purchase_request("PR000001").await;
        assert!(result.is_err());
    }
}
