//! Translation of database errors into store errors.
//!
//! The schema is the authoritative guard for name uniqueness and references;
//! its constraint violations are mapped onto the same errors the service
//! pre-checks produce.

use cashflow_core::CashFlowError;
use cashflow_core::catalog::CatalogKind;
use sea_orm::{DbErr, SqlErr};

/// Foreign key constraint names and the catalog kind each one points at.
const FOREIGN_KEYS: [(&str, CatalogKind); 6] = [
    ("fk_cash_flows_status", CatalogKind::Status),
    ("fk_cash_flows_operation_type", CatalogKind::OperationType),
    ("fk_cash_flows_category", CatalogKind::Category),
    ("fk_cash_flows_subcategory", CatalogKind::SubCategory),
    ("fk_categories_operation_type", CatalogKind::OperationType),
    ("fk_sub_categories_category", CatalogKind::Category),
];

/// Wraps an unclassified database error.
pub(crate) fn db_err(err: DbErr) -> CashFlowError {
    CashFlowError::Database(err.to_string())
}

/// Classifies a failed write.
///
/// `on_unique` builds the error for a unique index violation, `on_foreign_key`
/// the one for a foreign key violation (given the driver message). Anything
/// else becomes `Database`.
pub(crate) fn classify_write(
    err: DbErr,
    on_unique: impl FnOnce() -> CashFlowError,
    on_foreign_key: impl FnOnce(&str) -> CashFlowError,
) -> CashFlowError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => on_unique(),
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => on_foreign_key(&message),
        _ => db_err(err),
    }
}

/// Returns the catalog kind a violated foreign key refers to.
pub(crate) fn referenced_kind(message: &str) -> Option<CatalogKind> {
    FOREIGN_KEYS
        .iter()
        .find(|(constraint, _)| {
            message
                .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .any(|word| word == *constraint)
        })
        .map(|&(_, kind)| kind)
}
