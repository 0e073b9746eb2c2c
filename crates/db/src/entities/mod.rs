//! `SeaORM` entities for the cash-flow schema.

pub mod prelude;

pub mod cash_flows;
pub mod categories;
pub mod operation_types;
pub mod statuses;
pub mod sub_categories;
