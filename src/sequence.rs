use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr};
use tracing::warn;

use crate::entities::document_sequence;
use crate::errors::ServiceError;

/// Document families that carry sequential display numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PurchaseRequest,
    Rfq,
    PurchaseOrder,
}

impl DocumentKind {
    /// Key of the counter row in `document_sequences`.
    pub fn key(self) -> &'static str {
        match self {
            DocumentKind::PurchaseRequest => "pr",
            DocumentKind::Rfq => "rfq",
            DocumentKind::PurchaseOrder => "po",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::PurchaseRequest => "PR",
            DocumentKind::Rfq => "RFQ",
            DocumentKind::PurchaseOrder => "PO",
        }
    }

    /// Formats a claimed counter value as a display number. Values are
    /// zero-padded to six digits and widen past 999999 without truncation.
    pub fn format(self, value: i64) -> String {
        format!("{}{:06}", self.prefix(), value)
    }
}

const MAX_ALLOC_ATTEMPTS: u32 = 8;

/// Claims the next display number for `kind` with a compare-and-swap on the
/// counter row. Run this on the same transaction that inserts the document:
/// numbers are handed out in order and a rolled-back insert returns its
/// number only if nobody claimed past it, which the CAS retry handles.
pub async fn next_document_id<C>(conn: &C, kind: DocumentKind) -> Result<String, ServiceError>
where
    C: ConnectionTrait,
{
    for attempt in 0..MAX_ALLOC_ATTEMPTS {
        match document_sequence::Entity::find_by_id(kind.key())
            .one(conn)
            .await
            .map_err(ServiceError::DatabaseError)?
        {
            Some(row) => {
                let claimed = row.next_value;
                let update = document_sequence::Entity::update_many()
                    .col_expr(
                        document_sequence::Column::NextValue,
                        Expr::col(document_sequence::Column::NextValue).add(1),
                    )
                    .filter(document_sequence::Column::DocType.eq(kind.key()))
                    .filter(document_sequence::Column::NextValue.eq(claimed))
                    .exec(conn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                if update.rows_affected == 1 {
                    return Ok(kind.format(claimed));
                }
                warn!(
                    doc_type = kind.key(),
                    attempt, "lost sequence race, retrying allocation"
                );
            }
            None => {
                // First document of this kind: seed the counter already
                // advanced past the value we are claiming.
                let seed = document_sequence::ActiveModel {
                    doc_type: Set(kind.key().to_string()),
                    next_value: Set(2),
                };
                match document_sequence::Entity::insert(seed).exec(conn).await {
                    Ok(_) => return Ok(kind.format(1)),
                    Err(e) => match e.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            warn!(
                                doc_type = kind.key(),
                                attempt, "lost sequence seed race, retrying allocation"
                            );
                        }
                        _ => return Err(ServiceError::DatabaseError(e)),
                    },
                }
            }
        }
    }

    Err(ServiceError::InternalError(format!(
        "could not allocate a {} number after {} attempts",
        kind.prefix(),
        MAX_ALLOC_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_numbers_are_zero_padded_to_six_digits() {
        assert_eq!(DocumentKind::PurchaseRequest.format(1), "PR000001");
        assert_eq!(DocumentKind::Rfq.format(42), "RFQ000042");
        assert_eq!(DocumentKind::PurchaseOrder.format(999999), "PO999999");
    }

    #[test]
    fn display_numbers_widen_past_six_digits() {
        assert_eq!(DocumentKind::PurchaseRequest.format(1000000), "PR1000000");
        assert_eq!(DocumentKind::Rfq.format(1234567), "RFQ1234567");
    }

    #[test]
    fn counter_keys_are_distinct_per_kind() {
        assert_eq!(DocumentKind::PurchaseRequest.key(), "pr");
        assert_eq!(DocumentKind::Rfq.key(), "rfq");
        assert_eq!(DocumentKind::PurchaseOrder.key(), "po");
    }
}
