//! Reference catalog domain types.
//!
//! The catalog holds the four lookup dimensions a cash-flow record points at:
//! statuses, operation types, categories (nested under an operation type) and
//! subcategories (nested under a category).

use cashflow_shared::types::{CategoryId, OperationTypeId, SubCategoryId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::ValidationError;

/// Maximum length of a catalog entry name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// The kind of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// Orthogonal tag on a transaction (e.g. business vs. personal).
    Status,
    /// Top-level classification of a cash movement (e.g. income vs. expense).
    OperationType,
    /// Classification nested under an operation type.
    Category,
    /// Classification nested under a category.
    SubCategory,
}

impl CatalogKind {
    /// All catalog kinds, parents before children.
    pub const ALL: [Self; 4] = [
        Self::Status,
        Self::OperationType,
        Self::Category,
        Self::SubCategory,
    ];

    /// Returns the kind an entry of this kind must be nested under, if any.
    #[must_use]
    pub const fn parent_kind(self) -> Option<Self> {
        match self {
            Self::Status | Self::OperationType => None,
            Self::Category => Some(Self::OperationType),
            Self::SubCategory => Some(Self::Category),
        }
    }

    /// Returns the kind that is nested under this kind, if any.
    #[must_use]
    pub const fn child_kind(self) -> Option<Self> {
        match self {
            Self::Status | Self::SubCategory => None,
            Self::OperationType => Some(Self::Category),
            Self::Category => Some(Self::SubCategory),
        }
    }

    /// Returns the stable machine-readable name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::OperationType => "operation_type",
            Self::Category => "category",
            Self::SubCategory => "sub_category",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status => write!(f, "Status"),
            Self::OperationType => write!(f, "Operation type"),
            Self::Category => write!(f, "Category"),
            Self::SubCategory => write!(f, "Subcategory"),
        }
    }
}

/// The scope within which a catalog name must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum NameScope {
    /// Unique across all entries of the kind (statuses, operation types).
    Global,
    /// Unique among the categories of one operation type.
    OperationType(OperationTypeId),
    /// Unique among the subcategories of one category.
    Category(CategoryId),
}

impl NameScope {
    /// Derives the uniqueness scope of an entry from its kind and parent.
    ///
    /// # Errors
    ///
    /// Returns `MissingParent` when a nested kind has no parent and
    /// `UnexpectedParent` when a top-level kind is given one.
    pub fn resolve(kind: CatalogKind, parent_id: Option<Uuid>) -> Result<Self, ValidationError> {
        match (kind.parent_kind(), parent_id) {
            (None, None) => Ok(Self::Global),
            (None, Some(_)) => Err(ValidationError::UnexpectedParent(kind)),
            (Some(_), None) => Err(ValidationError::MissingParent(kind)),
            (Some(CatalogKind::OperationType), Some(id)) => {
                Ok(Self::OperationType(OperationTypeId::from_uuid(id)))
            }
            (Some(_), Some(id)) => Ok(Self::Category(CategoryId::from_uuid(id))),
        }
    }

    /// Returns the parent id this scope is keyed on, if any.
    #[must_use]
    pub const fn parent_id(self) -> Option<Uuid> {
        match self {
            Self::Global => None,
            Self::OperationType(id) => Some(id.into_inner()),
            Self::Category(id) => Some(id.into_inner()),
        }
    }
}

impl std::fmt::Display for NameScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::OperationType(id) => write!(f, "operation type {id}"),
            Self::Category(id) => write!(f, "category {id}"),
        }
    }
}

/// A single catalog entry of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Entry kind.
    pub kind: CatalogKind,
    /// Entry id.
    pub id: Uuid,
    /// Trimmed display name.
    pub name: String,
    /// Operation type id for categories, category id for subcategories.
    pub parent_id: Option<Uuid>,
}

impl CatalogEntry {
    /// Creates a new entry with a fresh time-ordered id.
    #[must_use]
    pub fn new(kind: CatalogKind, name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            kind,
            id: Uuid::now_v7(),
            name: name.into(),
            parent_id,
        }
    }

    /// Returns the uniqueness scope of this entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent does not match the kind.
    pub fn scope(&self) -> Result<NameScope, ValidationError> {
        NameScope::resolve(self.kind, self.parent_id)
    }

    /// Returns the lightweight `(id, name)` projection used by choice lists.
    #[must_use]
    pub fn choice(&self) -> ChoiceItem {
        ChoiceItem {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Views this entry as a category, if it is one.
    #[must_use]
    pub fn as_category(&self) -> Option<Category> {
        match (self.kind, self.parent_id) {
            (CatalogKind::Category, Some(parent)) => Some(Category {
                id: CategoryId::from_uuid(self.id),
                operation_type_id: OperationTypeId::from_uuid(parent),
            }),
            _ => None,
        }
    }

    /// Views this entry as a subcategory, if it is one.
    #[must_use]
    pub fn as_sub_category(&self) -> Option<SubCategory> {
        match (self.kind, self.parent_id) {
            (CatalogKind::SubCategory, Some(parent)) => Some(SubCategory {
                id: SubCategoryId::from_uuid(self.id),
                category_id: CategoryId::from_uuid(parent),
            }),
            _ => None,
        }
    }
}

/// Lightweight `(id, name)` pair for choice lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceItem {
    /// Entry id.
    pub id: Uuid,
    /// Entry name.
    pub name: String,
}

/// A category reference with its owning operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// The operation type this category belongs to.
    pub operation_type_id: OperationTypeId,
}

/// A subcategory reference with its owning category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    /// Subcategory id.
    pub id: SubCategoryId,
    /// The category this subcategory belongs to.
    pub category_id: CategoryId,
}
