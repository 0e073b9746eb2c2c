//! Field-level validation errors.
//!
//! Every variant names the input field it concerns so that a form or API
//! adapter can attach the message to the right place.

use cashflow_shared::types::{CategoryId, OperationTypeId, SubCategoryId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{CatalogKind, NameScope};

/// Errors raised by the validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ========== Cash-flow Field Errors ==========
    /// The transaction date lies after "today".
    #[error("Date {date} is in the future (today is {today})")]
    DateInFuture {
        /// The submitted date.
        date: NaiveDate,
        /// The reference date it was checked against.
        today: NaiveDate,
    },

    /// The amount is zero or negative.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The amount exceeds the allowed maximum.
    #[error("Amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge {
        /// The submitted amount.
        amount: Decimal,
        /// The upper bound (inclusive).
        max: Decimal,
    },

    /// The subcategory is not nested under the selected category.
    #[error("Subcategory {subcategory_id} does not belong to category {category_id}")]
    CategoryMismatch {
        /// The selected category.
        category_id: CategoryId,
        /// The selected subcategory.
        subcategory_id: SubCategoryId,
    },

    /// The category is not nested under the selected operation type.
    #[error(
        "Category {category_id} belongs to operation type {expected}, not {actual}"
    )]
    OperationTypeMismatch {
        /// The selected category.
        category_id: CategoryId,
        /// The operation type the category actually belongs to.
        expected: OperationTypeId,
        /// The operation type declared on the record.
        actual: OperationTypeId,
    },

    // ========== Catalog Name Errors ==========
    /// A name already exists in the same scope (ignoring case).
    #[error("{kind} named '{name}' already exists ({scope} scope)")]
    DuplicateName {
        /// Entry kind.
        kind: CatalogKind,
        /// The trimmed name that clashed.
        name: String,
        /// The uniqueness scope.
        scope: NameScope,
    },

    /// The name is empty after trimming.
    #[error("{0} name must not be empty")]
    EmptyName(CatalogKind),

    /// The name is longer than allowed.
    #[error("{kind} name must be at most {max} characters")]
    NameTooLong {
        /// Entry kind.
        kind: CatalogKind,
        /// Maximum length in characters.
        max: usize,
    },

    /// A nested kind was given without a parent.
    #[error("{0} requires a parent entry")]
    MissingParent(CatalogKind),

    /// A top-level kind was given a parent.
    #[error("{0} does not take a parent entry")]
    UnexpectedParent(CatalogKind),
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DateInFuture { .. } => "DATE_IN_FUTURE",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::CategoryMismatch { .. } => "CATEGORY_MISMATCH",
            Self::OperationTypeMismatch { .. } => "OPERATION_TYPE_MISMATCH",
            Self::DuplicateName { .. } => "DUPLICATE_NAME",
            Self::EmptyName(_) => "EMPTY_NAME",
            Self::NameTooLong { .. } => "NAME_TOO_LONG",
            Self::MissingParent(_) => "MISSING_PARENT",
            Self::UnexpectedParent(_) => "UNEXPECTED_PARENT",
        }
    }

    /// Returns the input field the error should be reported against.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::DateInFuture { .. } => "date",
            Self::NonPositiveAmount(_) | Self::AmountTooLarge { .. } => "amount",
            Self::CategoryMismatch { .. } => "subcategory",
            Self::OperationTypeMismatch { .. } => "category",
            Self::DuplicateName { .. } | Self::EmptyName(_) | Self::NameTooLong { .. } => "name",
            Self::MissingParent(_) | Self::UnexpectedParent(_) => "parent",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateName { .. } => 409,
            _ => 400,
        }
    }

    /// Validation failures depend only on the input; retrying never helps.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes_and_fields() {
        let err = ValidationError::NonPositiveAmount(dec!(0));
        assert_eq!(err.error_code(), "NON_POSITIVE_AMOUNT");
        assert_eq!(err.field(), "amount");

        let err = ValidationError::CategoryMismatch {
            category_id: CategoryId::new(),
            subcategory_id: SubCategoryId::new(),
        };
        assert_eq!(err.error_code(), "CATEGORY_MISMATCH");
        assert_eq!(err.field(), "subcategory");

        assert_eq!(ValidationError::EmptyName(CatalogKind::Status).field(), "name");
    }

    #[test]
    fn test_http_status_codes() {
        let duplicate = ValidationError::DuplicateName {
            kind: CatalogKind::Status,
            name: "VIP".to_string(),
            scope: NameScope::Global,
        };
        assert_eq!(duplicate.http_status_code(), 409);
        assert_eq!(
            ValidationError::NonPositiveAmount(dec!(-1)).http_status_code(),
            400
        );
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::DateInFuture {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            today: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Date 2024-02-01 is in the future (today is 2024-01-31)"
        );

        let err = ValidationError::DuplicateName {
            kind: CatalogKind::Status,
            name: "VIP".to_string(),
            scope: NameScope::Global,
        };
        assert_eq!(err.to_string(), "Status named 'VIP' already exists (global scope)");

        let err = ValidationError::AmountTooLarge {
            amount: dec!(1000000001),
            max: dec!(1000000000),
        };
        assert_eq!(
            err.to_string(),
            "Amount 1000000001 exceeds the maximum of 1000000000"
        );
    }
}
