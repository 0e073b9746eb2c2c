//! Reference catalog: statuses, operation types, categories and subcategories.

pub mod service;
pub mod types;

pub use service::CatalogService;
pub use types::{
    CatalogEntry, CatalogKind, Category, ChoiceItem, MAX_NAME_LENGTH, NameScope, SubCategory,
};
