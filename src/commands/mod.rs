use crate::{db::DbPool, errors::ServiceError, events::EventSender};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Command trait for implementing the Command Pattern
///
/// This trait allows for encapsulating all the logic needed to execute a business operation
/// into a single object that can be validated, executed, and produce events.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command with the given dependencies
    ///
    /// # Arguments
    /// * `db_pool` - Database connection pool for persistence operations
    /// * `event_sender` - Channel to publish domain events
    ///
    /// # Returns
    /// * `Result<Self::Result, ServiceError>` - The result of command execution or an error
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError>;
}

/// One line of a procurement document. Purchase requests, RFQs, purchase
/// orders and vendor quotes all carry the same item shape, so the commands
/// share this input type. Line totals are derived, never part of the input.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DocumentItemInput {
    pub product_id: Uuid,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "validate_money")]
    pub estimated_unit_price: Decimal,
}

/// Money inputs must be non-negative and carry at most two decimal places.
/// Trailing zeros are tolerated ("10.000" normalizes to scale 1).
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("money_negative"));
    }
    if value.normalize().scale() > 2 {
        return Err(ValidationError::new("money_precision"));
    }
    Ok(())
}

/// Verifies that every product referenced by `items` exists. Reports the
/// first missing id as a not-found error so callers surface a 404 rather
/// than a foreign-key violation.
pub(crate) async fn ensure_products_exist<C>(
    conn: &C,
    items: &[DocumentItemInput],
) -> Result<(), ServiceError>
where
    C: sea_orm::ConnectionTrait,
{
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use std::collections::HashSet;

    let mut wanted: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
    wanted.sort();
    wanted.dedup();
    if wanted.is_empty() {
        return Ok(());
    }

    let found: HashSet<Uuid> = crate::entities::product::Entity::find()
        .filter(crate::entities::product::Column::Id.is_in(wanted.clone()))
        .all(conn)
        .await
        .map_err(ServiceError::DatabaseError)?
        .into_iter()
        .map(|product| product.id)
        .collect();

    if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
        return Err(ServiceError::NotFound(format!(
            "Product {} not found",
            missing
        )));
    }
    Ok(())
}

pub mod purchaseorders;
pub mod purchaserequests;
pub mod rfqs;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_rejects_negative_values() {
        assert!(validate_money(&dec!(-0.01)).is_err());
        assert!(validate_money(&dec!(0.00)).is_ok());
    }

    #[test]
    fn money_rejects_sub_cent_precision() {
        assert!(validate_money(&dec!(10.001)).is_err());
        assert!(validate_money(&dec!(10.01)).is_ok());
    }

    #[test]
    fn money_tolerates_trailing_zeros() {
        assert!(validate_money(&dec!(10.000)).is_ok());
    }

    #[test]
    fn item_input_validates_quantity() {
        let item = DocumentItemInput {
            product_id: uuid::Uuid::new_v4(),
            description: None,
            quantity: 0,
            estimated_unit_price: dec!(1.00),
        };
        assert!(item.validate().is_err());
    }
}
