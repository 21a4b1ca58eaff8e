use crate::{
    db::DbPool,
    entities::{
        product::{self, ProductType},
        product_category, unit_of_measure, vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the product master. Every product is owned by a vendor; the
/// unit and category references are optional and may be severed later.
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        name: String,
        unit_id: Option<Uuid>,
        product_type: ProductType,
        category_id: Option<Uuid>,
        vendor_id: Uuid,
        cost_price: Decimal,
        selling_price: Decimal,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        self.check_references(unit_id, category_id, Some(vendor_id))
            .await?;

        let now = Utc::now();
        let saved = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            unit_id: Set(unit_id),
            product_type: Set(product_type),
            category_id: Set(category_id),
            vendor_id: Set(vendor_id),
            cost_price: Set(cost_price),
            selling_price: Set(selling_price),
            is_hidden: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(ServiceError::DatabaseError)?;

        self.event_sender
            .send(Event::ProductCreated(saved.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = product::Entity::find();
        if !include_hidden {
            query = query.filter(product::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(product::Column::IsHidden)
            .order_by_desc(product::Column::UpdatedAt)
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
    pub async fn get_product(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;
        product::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<String>,
        unit_id: Option<Uuid>,
        product_type: Option<ProductType>,
        category_id: Option<Uuid>,
        vendor_id: Option<Uuid>,
        cost_price: Option<Decimal>,
        selling_price: Option<Decimal>,
    ) -> Result<product::Model, ServiceError> {
        let existing = self.get_product(id).await?;
        let db = &*self.db_pool;

        self.check_references(unit_id, category_id, vendor_id)
            .await?;

        let mut active: product::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(unit_id) = unit_id {
            active.unit_id = Set(Some(unit_id));
        }
        if let Some(product_type) = product_type {
            active.product_type = Set(product_type);
        }
        if let Some(category_id) = category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(vendor_id) = vendor_id {
            active.vendor_id = Set(vendor_id);
        }
        if let Some(cost_price) = cost_price {
            active.cost_price = Set(cost_price);
        }
        if let Some(selling_price) = selling_price {
            active.selling_price = Set(selling_price);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(ServiceError::DatabaseError)?;

        self.event_sender
            .send(Event::ProductUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn hide_product(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        let existing = self.get_product(id).await?;
        let db = &*self.db_pool;
        let hidden = !existing.is_hidden;
        let mut active: product::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    async fn check_references(
        &self,
        unit_id: Option<Uuid>,
        category_id: Option<Uuid>,
        vendor_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        if let Some(unit_id) = unit_id {
            unit_of_measure::Entity::find_by_id(unit_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Unit of measure {} not found", unit_id))
                })?;
        }
        if let Some(category_id) = category_id {
            product_category::Entity::find_by_id(category_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product category {} not found", category_id))
                })?;
        }
        if let Some(vendor_id) = vendor_id {
            vendor::Entity::find_by_id(vendor_id)
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_id)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_service() -> ProductService {
        let db_pool = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        let event_sender = Arc::new(EventSender::new(tx));
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        ProductService::new(db_pool, event_sender, logger)
    }

    #[tokio::test]
    async fn create_product_fails_without_database() {
        let service = test_service();
        let result = service
            .create_product(
                "Laptop".to_string(),
                None,
                ProductType::Storeable,
                None,
                Uuid::new_v4(),
                dec!(850.00),
                dec!(1100.00),
            )
            .await;
        assert!(result.is_err());
    }
}
