//! Entity re-exports.

pub use super::cash_flows::Entity as CashFlows;
pub use super::categories::Entity as Categories;
pub use super::operation_types::Entity as OperationTypes;
pub use super::statuses::Entity as Statuses;
pub use super::sub_categories::Entity as SubCategories;
