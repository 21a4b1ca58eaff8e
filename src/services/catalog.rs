use crate::{
    db::DbPool,
    entities::{department, product_category, unit_of_measure, vendor_category},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the catalog reference entities: units of measure, product
/// categories, departments and vendor categories. These are plain CRUD rows
/// with a soft-hide flag; nothing here allocates document numbers or sends
/// mail, so the service queries the database directly.
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl CatalogService {
    /// Creates a new catalog service instance
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    // Units of measure

    #[instrument(skip(self))]
    pub async fn create_unit_of_measure(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<unit_of_measure::Model, ServiceError> {
        let db = &*self.db_pool;
        unit_of_measure::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            is_hidden: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_units_of_measure(
        &self,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<unit_of_measure::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = unit_of_measure::Entity::find();
        if !include_hidden {
            query = query.filter(unit_of_measure::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(unit_of_measure::Column::IsHidden)
            .order_by_desc(unit_of_measure::Column::CreatedAt)
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
    pub async fn get_unit_of_measure(
        &self,
        id: Uuid,
    ) -> Result<unit_of_measure::Model, ServiceError> {
        let db = &*self.db_pool;
        unit_of_measure::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Unit of measure {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn update_unit_of_measure(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<unit_of_measure::Model, ServiceError> {
        let existing = self.get_unit_of_measure(id).await?;
        let db = &*self.db_pool;
        let mut active: unit_of_measure::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Flips the soft-hide flag and returns the updated row.
    #[instrument(skip(self))]
    pub async fn hide_unit_of_measure(
        &self,
        id: Uuid,
    ) -> Result<unit_of_measure::Model, ServiceError> {
        let existing = self.get_unit_of_measure(id).await?;
        let db = &*self.db_pool;
        let hidden = !existing.is_hidden;
        let mut active: unit_of_measure::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    // Product categories

    #[instrument(skip(self))]
    pub async fn create_product_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<product_category::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();
        product_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            is_hidden: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_product_categories(
        &self,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<product_category::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = product_category::Entity::find();
        if !include_hidden {
            query = query.filter(product_category::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(product_category::Column::IsHidden)
            .order_by_desc(product_category::Column::UpdatedAt)
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
    pub async fn get_product_category(
        &self,
        id: Uuid,
    ) -> Result<product_category::Model, ServiceError> {
        let db = &*self.db_pool;
        product_category::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product category {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn update_product_category(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<product_category::Model, ServiceError> {
        let existing = self.get_product_category(id).await?;
        let db = &*self.db_pool;
        let mut active: product_category::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn hide_product_category(
        &self,
        id: Uuid,
    ) -> Result<product_category::Model, ServiceError> {
        let existing = self.get_product_category(id).await?;
        let db = &*self.db_pool;
        let hidden = !existing.is_hidden;
        let mut active: product_category::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    // Departments

    #[instrument(skip(self))]
    pub async fn create_department(&self, name: String) -> Result<department::Model, ServiceError> {
        let db = &*self.db_pool;
        department::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            is_hidden: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_departments(
        &self,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<department::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = department::Entity::find();
        if !include_hidden {
            query = query.filter(department::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(department::Column::IsHidden)
            .order_by_desc(department::Column::CreatedAt)
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
    pub async fn get_department(&self, id: Uuid) -> Result<department::Model, ServiceError> {
        let db = &*self.db_pool;
        department::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Department {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn update_department(
        &self,
        id: Uuid,
        name: Option<String>,
    ) -> Result<department::Model, ServiceError> {
        let existing = self.get_department(id).await?;
        let db = &*self.db_pool;
        let mut active: department::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn hide_department(&self, id: Uuid) -> Result<department::Model, ServiceError> {
        let existing = self.get_department(id).await?;
        let db = &*self.db_pool;
        let hidden = !existing.is_hidden;
        let mut active: department::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    // Vendor categories

    #[instrument(skip(self))]
    pub async fn create_vendor_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<vendor_category::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();
        vendor_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            is_hidden: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_vendor_categories(
        &self,
        include_hidden: bool,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<vendor_category::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = vendor_category::Entity::find();
        if !include_hidden {
            query = query.filter(vendor_category::Column::IsHidden.eq(false));
        }
        let paginator = query
            .order_by_asc(vendor_category::Column::IsHidden)
            .order_by_desc(vendor_category::Column::UpdatedAt)
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
    pub async fn get_vendor_category(
        &self,
        id: Uuid,
    ) -> Result<vendor_category::Model, ServiceError> {
        let db = &*self.db_pool;
        vendor_category::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor category {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn update_vendor_category(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<vendor_category::Model, ServiceError> {
        let existing = self.get_vendor_category(id).await?;
        let db = &*self.db_pool;
        let mut active: vendor_category::ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn hide_vendor_category(
        &self,
        id: Uuid,
    ) -> Result<vendor_category::Model, ServiceError> {
        let existing = self.get_vendor_category(id).await?;
        let db = &*self.db_pool;
        let hidden = !existing.is_hidden;
        let mut active: vendor_category::ActiveModel = existing.into();
        active.is_hidden = Set(hidden);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> CatalogService {
        let db_pool = Arc::new(sea_orm::DatabaseConnection::Disconnected);
        let logger = slog::Logger::root(slog::Discard, slog::o!());
        CatalogService::new(db_pool, logger)
    }

    #[tokio::test]
    async fn get_unit_of_measure_fails_without_database() {
        let service = test_service();
        let result = service.get_unit_of_measure(Uuid::new_v4()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn create_department_fails_without_database() {
        let service = test_service();
        let result = service.create_department("Engineering".to_string()).await;
        assert!(result.is_err());
    }
}
