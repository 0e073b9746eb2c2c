//! Validation rules for catalog entries and cash-flow records.
//!
//! All functions here are pure: they read only their arguments and never
//! touch a store. Callers fetch whatever they need (the entries sharing a
//! name scope, the selected category) beforehand.

use cashflow_shared::types::{OperationTypeId, StatusId};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValidationError;
use crate::catalog::{CatalogEntry, CatalogKind, Category, MAX_NAME_LENGTH, NameScope, SubCategory};

/// Upper bound (inclusive) for a cash-flow amount.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Number of fractional digits amounts are stored with.
pub const AMOUNT_SCALE: u32 = 2;

/// Checks that a transaction date is not after `today`.
///
/// # Errors
///
/// Returns `DateInFuture` when `date > today`.
pub fn validate_date(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if date > today {
        return Err(ValidationError::DateInFuture { date, today });
    }
    Ok(date)
}

/// Checks the amount bounds and rounds it to two decimal places.
///
/// Bounds are checked on the raw value. Rounding is half-up (midpoint away
/// from zero), so `123.455` becomes `123.46`.
///
/// # Errors
///
/// Returns `NonPositiveAmount` when `amount <= 0` or when it rounds to zero,
/// and `AmountTooLarge` when `amount > MAX_AMOUNT`.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        });
    }

    let mut rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    if rounded.is_zero() {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(rounded)
}

/// Checks that the subcategory is nested under the category.
///
/// A no-op while either side is still unselected.
///
/// # Errors
///
/// Returns `CategoryMismatch` when both are present and unrelated.
pub fn validate_category_relation(
    category: Option<&Category>,
    subcategory: Option<&SubCategory>,
) -> Result<(), ValidationError> {
    if let (Some(category), Some(subcategory)) = (category, subcategory)
        && subcategory.category_id != category.id
    {
        return Err(ValidationError::CategoryMismatch {
            category_id: category.id,
            subcategory_id: subcategory.id,
        });
    }
    Ok(())
}

/// Checks that the category belongs to the declared operation type.
///
/// The category's own operation type is authoritative.
///
/// # Errors
///
/// Returns `OperationTypeMismatch` when they differ.
pub fn validate_operation_type_relation(
    category: &Category,
    operation_type_id: OperationTypeId,
) -> Result<(), ValidationError> {
    if category.operation_type_id != operation_type_id {
        return Err(ValidationError::OperationTypeMismatch {
            category_id: category.id,
            expected: category.operation_type_id,
            actual: operation_type_id,
        });
    }
    Ok(())
}

/// Trims a catalog name and checks its length.
///
/// # Errors
///
/// Returns `EmptyName` or `NameTooLong`.
pub fn normalize_name(kind: CatalogKind, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName(kind));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            kind,
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

/// Compares two names the way the uniqueness rule does: trimmed, ignoring case.
#[must_use]
pub fn names_match(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

/// Checks that `name` is unique within `scope`, ignoring case.
///
/// `existing` may contain entries of other kinds or scopes; only those of
/// `kind` in `scope` are compared. The entry identified by `exclude_id` is
/// skipped so that renaming an entry to its own name succeeds.
///
/// # Errors
///
/// Returns the `normalize_name` errors, or `DuplicateName`.
pub fn validate_unique_name<'a, I>(
    kind: CatalogKind,
    name: &str,
    scope: NameScope,
    exclude_id: Option<Uuid>,
    existing: I,
) -> Result<String, ValidationError>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let name = normalize_name(kind, name)?;

    let clash = existing.into_iter().any(|entry| {
        entry.kind == kind
            && entry.parent_id == scope.parent_id()
            && Some(entry.id) != exclude_id
            && names_match(&entry.name, &name)
    });

    if clash {
        return Err(ValidationError::DuplicateName { kind, name, scope });
    }
    Ok(name)
}

/// A possibly partial set of cash-flow fields, as collected mid-form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowFields {
    /// Transaction date.
    pub date: Option<NaiveDate>,
    /// Transaction amount.
    pub amount: Option<Decimal>,
    /// Selected status.
    pub status_id: Option<StatusId>,
    /// Selected operation type.
    pub operation_type_id: Option<OperationTypeId>,
    /// Selected category with its operation type.
    pub category: Option<Category>,
    /// Selected subcategory with its category.
    pub subcategory: Option<SubCategory>,
    /// Free-text comment.
    pub comment: Option<String>,
}

/// Applies the field rules to whichever fields are present.
///
/// Order: date, amount, category/subcategory relation. The first failure is
/// returned. Applying it to its own output yields the same output.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate_all(
    fields: &CashFlowFields,
    today: NaiveDate,
) -> Result<CashFlowFields, ValidationError> {
    let mut validated = fields.clone();

    if let Some(date) = validated.date {
        validated.date = Some(validate_date(date, today)?);
    }

    if let Some(amount) = validated.amount {
        validated.amount = Some(validate_amount(amount)?);
    }

    validate_category_relation(validated.category.as_ref(), validated.subcategory.as_ref())?;

    Ok(validated)
}
