//! Cash-flow records and the policy every write goes through.

pub mod policy;
pub mod service;
pub mod types;

pub use policy::{CashFlowPolicy, ResolvedReferences, normalize_comment};
pub use service::CashFlowService;
pub use types::{CashFlow, CashFlowInput};
