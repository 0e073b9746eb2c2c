//! Cash-flow record repository.

use async_trait::async_trait;
use cashflow_core::CashFlowError;
use cashflow_core::cashflow::CashFlow;
use cashflow_core::catalog::CatalogKind;
use cashflow_core::query::{CashFlowQuery, SortDirection, SortField};
use cashflow_core::store::{CashFlowStore, StoreResult};
use cashflow_shared::types::{CashFlowId, CategoryId, OperationTypeId, StatusId, SubCategoryId};
use sea_orm::sea_query::Order;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::entities::cash_flows;
use crate::error::{classify_write, db_err, referenced_kind};

/// Cash-flow repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct CashFlowRepository {
    db: DatabaseConnection,
}

impl CashFlowRepository {
    /// Creates a new cash-flow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_record(model: cash_flows::Model) -> CashFlow {
    CashFlow {
        id: CashFlowId::from_uuid(model.id),
        date: model.date,
        status_id: StatusId::from_uuid(model.status_id),
        operation_type_id: OperationTypeId::from_uuid(model.operation_type_id),
        category_id: CategoryId::from_uuid(model.category_id),
        subcategory_id: SubCategoryId::from_uuid(model.subcategory_id),
        amount: model.amount,
        comment: model.comment,
    }
}

/// Maps a foreign key violation on a record write to the missing reference.
fn missing_reference(record: &CashFlow, message: &str) -> CashFlowError {
    match referenced_kind(message) {
        Some(kind @ CatalogKind::Status) => CashFlowError::CatalogNotFound {
            kind,
            id: record.status_id.into_inner(),
        },
        Some(kind @ CatalogKind::OperationType) => CashFlowError::CatalogNotFound {
            kind,
            id: record.operation_type_id.into_inner(),
        },
        Some(kind @ CatalogKind::Category) => CashFlowError::CatalogNotFound {
            kind,
            id: record.category_id.into_inner(),
        },
        Some(kind @ CatalogKind::SubCategory) => CashFlowError::CatalogNotFound {
            kind,
            id: record.subcategory_id.into_inner(),
        },
        None => CashFlowError::Database(message.to_string()),
    }
}

fn unexpected_unique(record: &CashFlow) -> CashFlowError {
    CashFlowError::Database(format!("unexpected unique violation on record {}", record.id))
}

#[async_trait]
impl CashFlowStore for CashFlowRepository {
    async fn find_record(&self, id: CashFlowId) -> StoreResult<Option<CashFlow>> {
        Ok(cash_flows::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_record))
    }

    async fn list_records(&self, query: &CashFlowQuery) -> StoreResult<Vec<CashFlow>> {
        debug!(
            start = ?query.range.start,
            end = ?query.range.end,
            sort = %query.sort,
            "Listing cash-flow records"
        );

        let mut select = cash_flows::Entity::find();
        if let Some(start) = query.range.start {
            select = select.filter(cash_flows::Column::Date.gte(start));
        }
        if let Some(end) = query.range.end {
            select = select.filter(cash_flows::Column::Date.lte(end));
        }

        let column = match query.sort.field {
            SortField::Date => cash_flows::Column::Date,
            SortField::Amount => cash_flows::Column::Amount,
        };
        let order = match query.sort.direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };

        let records = select
            .order_by(column, order)
            .order_by_asc(cash_flows::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(to_record)
            .collect();

        Ok(records)
    }

    async fn insert_record(&self, record: &CashFlow) -> StoreResult<()> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        cash_flows::ActiveModel {
            id: Set(record.id.into_inner()),
            date: Set(record.date),
            status_id: Set(record.status_id.into_inner()),
            operation_type_id: Set(record.operation_type_id.into_inner()),
            category_id: Set(record.category_id.into_inner()),
            subcategory_id: Set(record.subcategory_id.into_inner()),
            amount: Set(record.amount),
            comment: Set(record.comment.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|err| {
            classify_write(
                err,
                || unexpected_unique(record),
                |message| missing_reference(record, message),
            )
        })?;

        Ok(())
    }

    async fn update_record(&self, record: &CashFlow) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let exists = cash_flows::Entity::find_by_id(record.id.into_inner())
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(CashFlowError::CashFlowNotFound(record.id));
        }

        cash_flows::ActiveModel {
            id: Set(record.id.into_inner()),
            date: Set(record.date),
            status_id: Set(record.status_id.into_inner()),
            operation_type_id: Set(record.operation_type_id.into_inner()),
            category_id: Set(record.category_id.into_inner()),
            subcategory_id: Set(record.subcategory_id.into_inner()),
            amount: Set(record.amount),
            comment: Set(record.comment.clone()),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|err| {
            classify_write(
                err,
                || unexpected_unique(record),
                |message| missing_reference(record, message),
            )
        })?;

        txn.commit().await.map_err(db_err)
    }

    async fn delete_record(&self, id: CashFlowId) -> StoreResult<()> {
        let result = cash_flows::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(CashFlowError::CashFlowNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record() -> CashFlow {
        CashFlow {
            id: CashFlowId::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status_id: StatusId::new(),
            operation_type_id: OperationTypeId::new(),
            category_id: CategoryId::new(),
            subcategory_id: SubCategoryId::new(),
            amount: dec!(10.00),
            comment: None,
        }
    }

    #[test]
    fn test_missing_reference_picks_the_violated_column() {
        let record = record();
        let err = missing_reference(
            &record,
            r#"insert or update on table "cash_flows" violates foreign key constraint "fk_cash_flows_category""#,
        );
        match err {
            CashFlowError::CatalogNotFound { kind, id } => {
                assert_eq!(kind, CatalogKind::Category);
                assert_eq!(id, record.category_id.into_inner());
            }
            other => panic!("expected CatalogNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_reference_unknown_constraint() {
        let err = missing_reference(&record(), "violates foreign key constraint \"x\"");
        assert!(matches!(err, CashFlowError::Database(_)));
    }

    #[test]
    fn test_model_conversion_keeps_ids() {
        let now = chrono::Utc::now().into();
        let model = cash_flows::Model {
            id: uuid::Uuid::now_v7(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status_id: uuid::Uuid::now_v7(),
            operation_type_id: uuid::Uuid::now_v7(),
            category_id: uuid::Uuid::now_v7(),
            subcategory_id: uuid::Uuid::now_v7(),
            amount: dec!(99.90),
            comment: Some("VPS renewal".to_string()),
            created_at: now,
            updated_at: now,
        };

        let record = to_record(model.clone());
        assert_eq!(record.id.into_inner(), model.id);
        assert_eq!(record.subcategory_id.into_inner(), model.subcategory_id);
        assert_eq!(record.amount, dec!(99.90));
        assert_eq!(record.comment.as_deref(), Some("VPS renewal"));
    }
}
