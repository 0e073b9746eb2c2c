//! Aggregate rules a cash-flow record must satisfy before it is written.

use chrono::NaiveDate;

use super::types::CashFlowInput;
use crate::catalog::{Category, SubCategory};
use crate::validation::{
    CashFlowFields, ValidationError, validate_all, validate_category_relation,
    validate_operation_type_relation,
};

/// Catalog references of a record, resolved from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedReferences {
    /// The selected category with its operation type.
    pub category: Category,
    /// The selected subcategory with its category.
    pub subcategory: SubCategory,
}

/// Record policy: ties a record to one consistent
/// (operation type, category, subcategory) triple.
pub struct CashFlowPolicy;

impl CashFlowPolicy {
    /// Validates a complete record and returns it normalized.
    ///
    /// Steps:
    /// 1. Date, amount and category/subcategory rules via `validate_all`
    /// 2. Subcategory belongs to category, checked again on the aggregate
    /// 3. Category belongs to the declared operation type
    /// 4. Blank comments become `None`
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered.
    pub fn check(
        input: &CashFlowInput,
        references: &ResolvedReferences,
        today: NaiveDate,
    ) -> Result<CashFlowInput, ValidationError> {
        let fields = CashFlowFields {
            date: Some(input.date),
            amount: Some(input.amount),
            status_id: Some(input.status_id),
            operation_type_id: Some(input.operation_type_id),
            category: Some(references.category),
            subcategory: Some(references.subcategory),
            comment: input.comment.clone(),
        };
        let validated = validate_all(&fields, today)?;

        validate_category_relation(Some(&references.category), Some(&references.subcategory))?;
        validate_operation_type_relation(&references.category, input.operation_type_id)?;

        Ok(CashFlowInput {
            date: validated.date.unwrap_or(input.date),
            amount: validated.amount.unwrap_or(input.amount),
            comment: normalize_comment(validated.comment),
            ..input.clone()
        })
    }
}

/// Trims a comment; blank comments are dropped.
#[must_use]
pub fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
