//! Repository implementations of the store contract.

pub mod cash_flow;
pub mod catalog;

pub use cash_flow::CashFlowRepository;
pub use catalog::CatalogRepository;
