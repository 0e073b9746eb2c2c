//! Catalog repository: statuses, operation types, categories and subcategories.

use async_trait::async_trait;
use cashflow_core::CashFlowError;
use cashflow_core::catalog::{CatalogEntry, CatalogKind, NameScope};
use cashflow_core::store::{CatalogStore, StoreResult};
use cashflow_core::validation::ValidationError;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func, Order, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{categories, operation_types, statuses, sub_categories};
use crate::error::{classify_write, db_err};

/// Catalog repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_in<C: ConnectionTrait>(
        conn: &C,
        kind: CatalogKind,
        id: Uuid,
    ) -> Result<Option<CatalogEntry>, DbErr> {
        Ok(match kind {
            CatalogKind::Status => statuses::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(status_entry),
            CatalogKind::OperationType => operation_types::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(operation_type_entry),
            CatalogKind::Category => categories::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(category_entry),
            CatalogKind::SubCategory => sub_categories::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(sub_category_entry),
        })
    }
}

fn status_entry(model: statuses::Model) -> CatalogEntry {
    CatalogEntry {
        kind: CatalogKind::Status,
        id: model.id,
        name: model.name,
        parent_id: None,
    }
}

fn operation_type_entry(model: operation_types::Model) -> CatalogEntry {
    CatalogEntry {
        kind: CatalogKind::OperationType,
        id: model.id,
        name: model.name,
        parent_id: None,
    }
}

fn category_entry(model: categories::Model) -> CatalogEntry {
    CatalogEntry {
        kind: CatalogKind::Category,
        id: model.id,
        name: model.name,
        parent_id: Some(model.operation_type_id),
    }
}

fn sub_category_entry(model: sub_categories::Model) -> CatalogEntry {
    CatalogEntry {
        kind: CatalogKind::SubCategory,
        id: model.id,
        name: model.name,
        parent_id: Some(model.category_id),
    }
}

/// `lower(name)`, the expression the unique indexes are built on.
fn lower<C: ColumnTrait>(column: C) -> SimpleExpr {
    SimpleExpr::FunctionCall(Func::lower(Expr::col(column)))
}

fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

fn duplicate(kind: CatalogKind, name: &str, scope: NameScope) -> CashFlowError {
    ValidationError::DuplicateName {
        kind,
        name: name.to_string(),
        scope,
    }
    .into()
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn find_entry(&self, kind: CatalogKind, id: Uuid) -> StoreResult<Option<CatalogEntry>> {
        Self::find_in(&self.db, kind, id).await.map_err(db_err)
    }

    async fn list_entries(
        &self,
        kind: CatalogKind,
        parent_id: Option<Uuid>,
    ) -> StoreResult<Vec<CatalogEntry>> {
        debug!(kind = %kind, parent_id = ?parent_id, "Listing catalog entries");

        let entries = match (kind, parent_id) {
            (CatalogKind::Status | CatalogKind::OperationType, Some(_)) => Vec::new(),
            (CatalogKind::Status, None) => statuses::Entity::find()
                .order_by(lower(statuses::Column::Name), Order::Asc)
                .order_by_asc(statuses::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(status_entry)
                .collect(),
            (CatalogKind::OperationType, None) => operation_types::Entity::find()
                .order_by(lower(operation_types::Column::Name), Order::Asc)
                .order_by_asc(operation_types::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(operation_type_entry)
                .collect(),
            (CatalogKind::Category, parent_id) => {
                let mut select = categories::Entity::find();
                if let Some(operation_type_id) = parent_id {
                    select = select.filter(categories::Column::OperationTypeId.eq(operation_type_id));
                }
                select
                    .order_by(lower(categories::Column::Name), Order::Asc)
                    .order_by_asc(categories::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(db_err)?
                    .into_iter()
                    .map(category_entry)
                    .collect()
            }
            (CatalogKind::SubCategory, parent_id) => {
                let mut select = sub_categories::Entity::find();
                if let Some(category_id) = parent_id {
                    select = select.filter(sub_categories::Column::CategoryId.eq(category_id));
                }
                select
                    .order_by(lower(sub_categories::Column::Name), Order::Asc)
                    .order_by_asc(sub_categories::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(db_err)?
                    .into_iter()
                    .map(sub_category_entry)
                    .collect()
            }
        };

        Ok(entries)
    }

    async fn insert_entry(&self, entry: &CatalogEntry) -> StoreResult<()> {
        let scope = entry.scope()?;
        let now = now();

        let result = match (entry.kind, scope) {
            (CatalogKind::Status, NameScope::Global) => statuses::ActiveModel {
                id: Set(entry.id),
                name: Set(entry.name.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
            (CatalogKind::OperationType, NameScope::Global) => operation_types::ActiveModel {
                id: Set(entry.id),
                name: Set(entry.name.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await
            .map(|_| ()),
            (CatalogKind::Category, NameScope::OperationType(operation_type_id)) => {
                categories::ActiveModel {
                    id: Set(entry.id),
                    operation_type_id: Set(operation_type_id.into_inner()),
                    name: Set(entry.name.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await
                .map(|_| ())
            }
            (CatalogKind::SubCategory, NameScope::Category(category_id)) => {
                sub_categories::ActiveModel {
                    id: Set(entry.id),
                    category_id: Set(category_id.into_inner()),
                    name: Set(entry.name.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await
                .map(|_| ())
            }
            (kind, _) => return Err(ValidationError::MissingParent(kind).into()),
        };

        result.map_err(|err| {
            classify_write(
                err,
                || duplicate(entry.kind, &entry.name, scope),
                |_| match (entry.kind.parent_kind(), scope.parent_id()) {
                    (Some(kind), Some(id)) => CashFlowError::CatalogNotFound { kind, id },
                    _ => CashFlowError::Database(format!(
                        "unexpected foreign key violation inserting {}",
                        entry.kind
                    )),
                },
            )
        })
    }

    async fn rename_entry(&self, kind: CatalogKind, id: Uuid, name: &str) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let entry = Self::find_in(&txn, kind, id)
            .await
            .map_err(db_err)?
            .ok_or(CashFlowError::CatalogNotFound { kind, id })?;
        let scope = entry.scope()?;
        let now = now();

        let result = match kind {
            CatalogKind::Status => statuses::ActiveModel {
                id: Set(id),
                name: Set(name.to_string()),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map(|_| ()),
            CatalogKind::OperationType => operation_types::ActiveModel {
                id: Set(id),
                name: Set(name.to_string()),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map(|_| ()),
            CatalogKind::Category => categories::ActiveModel {
                id: Set(id),
                name: Set(name.to_string()),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map(|_| ()),
            CatalogKind::SubCategory => sub_categories::ActiveModel {
                id: Set(id),
                name: Set(name.to_string()),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map(|_| ()),
        };

        result.map_err(|err| {
            classify_write(err, || duplicate(kind, name, scope), |message| {
                CashFlowError::Database(message.to_string())
            })
        })?;

        txn.commit().await.map_err(db_err)
    }

    async fn delete_entry(&self, kind: CatalogKind, id: Uuid) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if Self::find_in(&txn, kind, id).await.map_err(db_err)?.is_none() {
            return Err(CashFlowError::CatalogNotFound { kind, id });
        }

        // Children go with the parent (ON DELETE CASCADE); any referencing
        // record aborts the statement (ON DELETE RESTRICT).
        let result = match kind {
            CatalogKind::Status => statuses::Entity::delete_by_id(id).exec(&txn).await,
            CatalogKind::OperationType => {
                operation_types::Entity::delete_by_id(id).exec(&txn).await
            }
            CatalogKind::Category => categories::Entity::delete_by_id(id).exec(&txn).await,
            CatalogKind::SubCategory => sub_categories::Entity::delete_by_id(id).exec(&txn).await,
        };

        result.map_err(|err| {
            classify_write(
                err,
                || CashFlowError::Database(format!("unexpected unique violation deleting {kind}")),
                |_| CashFlowError::ReferentialIntegrity { kind, id },
            )
        })?;

        txn.commit().await.map_err(db_err)
    }
}
