use crate::{
    commands::purchaseorders::{
        CreatePurchaseOrderCommand, RecordPurchaseOrderQuoteCommand,
        ReplacePurchaseOrderItemsCommand, UpdatePurchaseOrderCommand,
    },
    commands::Command,
    db::DbPool,
    entities::{
        po_vendor_quote, po_vendor_quote_item, product,
        purchase_order::{self, Entity as PurchaseOrder, PurchaseOrderStatus},
        purchase_order_item, vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    metrics::BUSINESS_METRICS,
    money,
    notifications::{self, Mailer, OutboundEmail},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::json;
use slog::Logger;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for purchase orders, their dispatch to vendors, and the vendor
/// quotes recorded against them.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    mailer: Arc<dyn Mailer>,
    logger: Logger,
}

impl PurchaseOrderService {
    /// Creates a new purchase order service instance
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
    pub async fn create_purchase_order(
        &self,
        command: CreatePurchaseOrderCommand,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_item::Model>), ServiceError> {
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        BUSINESS_METRICS.purchase_orders_created.inc();
        self.get_purchase_order(&result.id).await
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        status: Option<PurchaseOrderStatus>,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = PurchaseOrder::find();
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }
        if !include_hidden {
            query = query.filter(purchase_order::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(purchase_order::Column::IsHidden)
            .order_by_desc(purchase_order::Column::UpdatedAt)
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
    pub async fn get_purchase_order(
        &self,
        id: &str,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_item::Model>), ServiceError> {
        let db = &*self.db_pool;
        let header = PurchaseOrder::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;
        let items = header
            .find_related(purchase_order_item::Entity)
            .order_by_asc(purchase_order_item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok((header, items))
    }

    #[instrument(skip(self))]
    pub async fn update_purchase_order(
        &self,
        command: UpdatePurchaseOrderCommand,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_item::Model>), ServiceError> {
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        self.get_purchase_order(&result.id).await
    }

    #[instrument(skip(self))]
    pub async fn replace_purchase_order_items(
        &self,
        command: ReplacePurchaseOrderItemsCommand,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_item::Model>), ServiceError> {
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        self.get_purchase_order(&result.id).await
    }

    #[instrument(skip(self))]
    pub async fn hide_purchase_order(
        &self,
        id: &str,
    ) -> Result<purchase_order::Model, ServiceError> {
        let (header, _) = self.get_purchase_order(id).await?;
        let db = &*self.db_pool;
        let hidden = !header.is_hidden;
        let mut active: purchase_order::ActiveModel = header.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Emails the purchase order to its vendor as a JSON snapshot of the
    /// document. Send failures surface to the caller; nothing is retried.
    #[instrument(skip(self))]
    pub async fn send_purchase_order(&self, id: &str) -> Result<String, ServiceError> {
        let (header, items) = self.get_purchase_order(id).await?;
        let vendor = self.vendor_of(&header).await?;

        let snapshot = self.document_snapshot(&header, &items, &vendor).await?;
        let subject = format!("Purchase Order: {}", header.id);
        let body = notifications::document_email_body(&subject, &snapshot);
        let email = OutboundEmail::new(vendor.email.clone(), subject, body);
        notifications::deliver(self.mailer.as_ref(), email).await?;

        BUSINESS_METRICS.purchase_orders_sent.inc();
        info!(purchase_order_id = %header.id, vendor_email = %vendor.email, "Purchase order emailed to vendor");

        self.event_sender
            .send(Event::PurchaseOrderSent {
                purchase_order_id: header.id.clone(),
                vendor_email: vendor.email.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(vendor.email)
    }

    /// Records a vendor quote against the purchase order and returns it with
    /// its items.
    #[instrument(skip(self))]
    pub async fn record_quote(
        &self,
        command: RecordPurchaseOrderQuoteCommand,
    ) -> Result<(po_vendor_quote::Model, Vec<po_vendor_quote_item::Model>), ServiceError> {
        let result = command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        BUSINESS_METRICS.quotes_recorded.inc();
        self.get_quote(result.quote_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_quotes(
        &self,
        purchase_order_id: &str,
    ) -> Result<Vec<(po_vendor_quote::Model, Vec<po_vendor_quote_item::Model>)>, ServiceError>
    {
        let db = &*self.db_pool;
        // 404 on an unknown document rather than an empty list
        PurchaseOrder::find_by_id(purchase_order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", purchase_order_id))
            })?;

        po_vendor_quote::Entity::find()
            .filter(po_vendor_quote::Column::PurchaseOrderId.eq(purchase_order_id))
            .order_by_desc(po_vendor_quote::Column::CreatedAt)
            .find_with_related(po_vendor_quote_item::Entity)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get_quote(
        &self,
        quote_id: Uuid,
    ) -> Result<(po_vendor_quote::Model, Vec<po_vendor_quote_item::Model>), ServiceError> {
        let db = &*self.db_pool;
        let quote = po_vendor_quote::Entity::find_by_id(quote_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Quote {} not found", quote_id)))?;
        let items = quote
            .find_related(po_vendor_quote_item::Entity)
            .order_by_asc(po_vendor_quote_item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok((quote, items))
    }

    async fn vendor_of(
        &self,
        header: &purchase_order::Model,
    ) -> Result<vendor::Model, ServiceError> {
        let db = &*self.db_pool;
        vendor::Entity::find_by_id(header.vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Vendor {} not found", header.vendor_id))
            })
    }

    /// Serializes the document for the outgoing email: header fields, the
    /// vendor's name, and each line with its derived total as strings.
    async fn document_snapshot(
        &self,
        header: &purchase_order::Model,
        items: &[purchase_order_item::Model],
        vendor: &vendor::Model,
    ) -> Result<serde_json::Value, ServiceError> {
        let db = &*self.db_pool;

        let mut product_ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
        product_ids.sort();
        product_ids.dedup();
        let product_names: HashMap<Uuid, String> = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let item_values: Vec<serde_json::Value> = items
            .iter()
            .map(|item| {
                let line_total = money::line_total(item.quantity, item.estimated_unit_price);
                json!({
                    "product": product_names.get(&item.product_id).cloned().unwrap_or_default(),
                    "description": item.description,
                    "quantity": item.quantity,
                    "unit_price": item.estimated_unit_price.to_string(),
                    "line_total": line_total.to_string(),
                })
            })
            .collect();
        let total = money::items_total(
            items
                .iter()
                .map(|item| (item.quantity, item.estimated_unit_price)),
        );

        Ok(json!({
            "id": header.id,
            "date": header.created_at.format("%Y-%m-%d").to_string(),
            "vendor": vendor.company_name,
            "status": header.status.to_string(),
            "items": item_values,
            "total": total.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::InMemoryMailer;

    fn test_service(mailer: Arc<InMemoryMailer>) -> PurchaseOrderService {
        let db_pool = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let event_sender = Arc::new(EventSender::new(tx));
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        PurchaseOrderService::new(db_pool, event_sender, mailer, logger)
    }

    #[tokio::test]
    async fn get_purchase_order_fails_without_database() {
        let service = test_service(Arc::new(InMemoryMailer::new()));
        let result = service.get_purchase_order("PO000001").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn send_purchase_order_fails_without_database_before_mailing() {
        let mailer = Arc::new(InMemoryMailer::new());
        let service = test_service(mailer.clone());
        let result = service.send_purchase_order("PO000001").await;
        assert!(result.is_err());
        assert!(mailer.sent().is_empty());
    }
}
