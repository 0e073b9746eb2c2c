//! Cash-flow record types.

use cashflow_shared::types::{CashFlowId, CategoryId, OperationTypeId, StatusId, SubCategoryId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Input for creating or replacing a cash-flow record.
///
/// Every field is required; partial input goes through
/// [`crate::validation::validate_all`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowInput {
    /// Transaction date.
    pub date: NaiveDate,
    /// Status tag.
    pub status_id: StatusId,
    /// Declared operation type.
    pub operation_type_id: OperationTypeId,
    /// Category (must belong to the operation type).
    pub category_id: CategoryId,
    /// Subcategory (must belong to the category).
    pub subcategory_id: SubCategoryId,
    /// Amount, positive.
    pub amount: Decimal,
    /// Optional free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// A persisted cash-flow record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Record id.
    pub id: CashFlowId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Status tag.
    pub status_id: StatusId,
    /// Operation type.
    pub operation_type_id: OperationTypeId,
    /// Category.
    pub category_id: CategoryId,
    /// Subcategory.
    pub subcategory_id: SubCategoryId,
    /// Amount with two fractional digits.
    pub amount: Decimal,
    /// Free-text comment, absent when blank.
    pub comment: Option<String>,
}

impl CashFlow {
    /// Builds a record from already validated input.
    #[must_use]
    pub fn from_input(id: CashFlowId, input: CashFlowInput) -> Self {
        Self {
            id,
            date: input.date,
            status_id: input.status_id,
            operation_type_id: input.operation_type_id,
            category_id: input.category_id,
            subcategory_id: input.subcategory_id,
            amount: input.amount,
            comment: input.comment,
        }
    }
}
