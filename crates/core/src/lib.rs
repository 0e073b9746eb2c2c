//! Core bookkeeping logic for cash-flow records.
//!
//! This crate has no web or database dependencies. Domain types, validation
//! rules, the record policy and the store contract live here.
//!
//! # Modules
//!
//! - `catalog` - Statuses, operation types, categories and subcategories
//! - `validation` - Field rules shared by every entry point
//! - `cashflow` - Record policy and the cash-flow service
//! - `query` - Date range filter and sort order for listings
//! - `store` - Persistence contract and the in-memory store
//! - `clock` - Source of "today"

pub mod cashflow;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod query;
pub mod store;
pub mod validation;

pub use error::CashFlowError;
