//! Validation service for catalog entries and cash-flow records.
//!
//! Every entry point (form handler, API endpoint, batch import) calls these
//! rules instead of re-implementing them.

pub mod error;
pub mod rules;

#[cfg(test)]
mod rules_props;

pub use error::ValidationError;
pub use rules::{
    AMOUNT_SCALE, CashFlowFields, MAX_AMOUNT, names_match, normalize_name, validate_all,
    validate_amount, validate_category_relation, validate_date, validate_operation_type_relation,
    validate_unique_name,
};
