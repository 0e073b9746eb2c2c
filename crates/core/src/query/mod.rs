//! Query and filter contract for listings.
//!
//! Used by stores to answer listing requests and by presentation adapters to
//! translate request parameters (`start_date`, `end_date`, `sort`).

pub mod filter;

pub use filter::{CashFlowQuery, CashFlowSort, DateRange, SortDirection, SortField, UnknownSortKey};
