//! Error types for catalog and cash-flow operations.
//!
//! `CashFlowError` is what every service and store operation returns. Field
//! rule violations are wrapped unchanged so callers can still reach the
//! offending field.

use cashflow_shared::AppError;
use cashflow_shared::types::CashFlowId;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::CatalogKind;
use crate::validation::ValidationError;

/// Errors that can occur during catalog and cash-flow operations.
#[derive(Debug, Error)]
pub enum CashFlowError {
    /// A field or cross-field rule was violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ========== Lookup Errors ==========
    /// A referenced catalog entry does not exist.
    #[error("{kind} not found: {id}")]
    CatalogNotFound {
        /// Entry kind.
        kind: CatalogKind,
        /// The missing id.
        id: Uuid,
    },

    /// The cash-flow record does not exist.
    #[error("Cash-flow record not found: {0}")]
    CashFlowNotFound(CashFlowId),

    // ========== Integrity Errors ==========
    /// The entry (or one of its children) is still referenced by records.
    #[error("{kind} {id} is referenced by cash-flow records and cannot be deleted")]
    ReferentialIntegrity {
        /// Entry kind.
        kind: CatalogKind,
        /// The protected id.
        id: Uuid,
    },

    // ========== Query Errors ==========
    /// The period start lies after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },

    // ========== Store Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CashFlowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::CatalogNotFound { .. } | Self::CashFlowNotFound(_) => "NOT_FOUND",
            Self::ReferentialIntegrity { .. } => "REFERENTIAL_INTEGRITY",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(err) => err.http_status_code(),
            Self::InvalidDateRange { .. } => 400,
            Self::CatalogNotFound { .. } | Self::CashFlowNotFound(_) => 404,
            Self::ReferentialIntegrity { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(err) => err.is_retryable(),
            Self::Database(_) => true,
            _ => false,
        }
    }

    /// Returns the validation error, if this is one.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CashFlowError> for AppError {
    fn from(err: CashFlowError) -> Self {
        match &err {
            CashFlowError::Database(message) => Self::Database(message.clone()),
            CashFlowError::Validation(ValidationError::DuplicateName { .. })
            | CashFlowError::ReferentialIntegrity { .. } => Self::Conflict(err.to_string()),
            CashFlowError::Validation(_) | CashFlowError::InvalidDateRange { .. } => {
                Self::Validation(err.to_string())
            }
            CashFlowError::CatalogNotFound { .. } | CashFlowError::CashFlowNotFound(_) => {
                Self::NotFound(err.to_string())
            }
        }
    }
}
