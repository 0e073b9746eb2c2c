//! Catalog service: create, rename, delete and look up reference entries.

use std::sync::Arc;

use cashflow_shared::types::{CategoryId, OperationTypeId, SubCategoryId};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::types::{CatalogEntry, CatalogKind, Category, ChoiceItem, NameScope, SubCategory};
use crate::error::CashFlowError;
use crate::store::CatalogStore;
use crate::validation::validate_unique_name;

/// Administrative operations over the reference catalog.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    /// Creates a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Creates an entry of `kind` named `name` under `parent_id`.
    ///
    /// Categories need an operation type parent, subcategories a category
    /// parent; statuses and operation types take none.
    ///
    /// # Errors
    ///
    /// - `MissingParent` / `UnexpectedParent` when the parent does not fit the kind
    /// - `CatalogNotFound` when the parent does not exist
    /// - `EmptyName`, `NameTooLong` or `DuplicateName` for a bad name
    pub async fn create(
        &self,
        kind: CatalogKind,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<CatalogEntry, CashFlowError> {
        let scope = NameScope::resolve(kind, parent_id)?;
        if let (Some(parent_kind), Some(parent_id)) = (kind.parent_kind(), scope.parent_id()) {
            self.get(parent_kind, parent_id).await?;
        }

        let existing = self.store.list_entries(kind, scope.parent_id()).await?;
        let name = validate_unique_name(kind, name, scope, None, &existing)?;

        let entry = CatalogEntry::new(kind, name, scope.parent_id());
        self.store.insert_entry(&entry).await?;

        info!(kind = %kind, id = %entry.id, name = %entry.name, "Catalog entry created");
        Ok(entry)
    }

    /// Renames an entry, keeping it unique within its scope.
    ///
    /// Renaming an entry to its own name (in any case) succeeds.
    ///
    /// # Errors
    ///
    /// `CatalogNotFound` for an unknown id; name errors as for `create`.
    pub async fn rename(
        &self,
        kind: CatalogKind,
        id: Uuid,
        new_name: &str,
    ) -> Result<CatalogEntry, CashFlowError> {
        let entry = self.get(kind, id).await?;
        let scope = entry.scope()?;

        let siblings = self.store.list_entries(kind, scope.parent_id()).await?;
        let name = validate_unique_name(kind, new_name, scope, Some(id), &siblings)?;

        self.store.rename_entry(kind, id, &name).await?;

        info!(kind = %kind, id = %id, old_name = %entry.name, new_name = %name, "Catalog entry renamed");
        Ok(CatalogEntry { name, ..entry })
    }

    /// Deletes an entry and, transitively, its children.
    ///
    /// # Errors
    ///
    /// `CatalogNotFound` for an unknown id; `ReferentialIntegrity` while a
    /// cash-flow record references the entry or one of its descendants.
    pub async fn delete(&self, kind: CatalogKind, id: Uuid) -> Result<(), CashFlowError> {
        match self.store.delete_entry(kind, id).await {
            Ok(()) => {
                info!(kind = %kind, id = %id, "Catalog entry deleted");
                Ok(())
            }
            Err(err) => {
                warn!(kind = %kind, id = %id, error_code = err.error_code(), "Catalog delete rejected");
                Err(err)
            }
        }
    }

    /// Fetches a single entry.
    ///
    /// # Errors
    ///
    /// `CatalogNotFound` for an unknown id.
    pub async fn get(&self, kind: CatalogKind, id: Uuid) -> Result<CatalogEntry, CashFlowError> {
        debug!(kind = %kind, id = %id, "Looking up catalog entry");
        self.store
            .find_entry(kind, id)
            .await?
            .ok_or(CashFlowError::CatalogNotFound { kind, id })
    }

    /// Lists entries of `kind`, optionally restricted to one parent.
    pub async fn list(
        &self,
        kind: CatalogKind,
        parent_id: Option<Uuid>,
    ) -> Result<Vec<CatalogEntry>, CashFlowError> {
        self.store.list_entries(kind, parent_id).await
    }

    /// `(id, name)` choice items for `kind`, ordered by name.
    pub async fn choices(
        &self,
        kind: CatalogKind,
        parent_id: Option<Uuid>,
    ) -> Result<Vec<ChoiceItem>, CashFlowError> {
        Ok(self
            .list(kind, parent_id)
            .await?
            .iter()
            .map(CatalogEntry::choice)
            .collect())
    }

    /// Category choices of one operation type.
    pub async fn categories_for(
        &self,
        operation_type_id: OperationTypeId,
    ) -> Result<Vec<ChoiceItem>, CashFlowError> {
        self.choices(CatalogKind::Category, Some(operation_type_id.into_inner()))
            .await
    }

    /// Subcategory choices of one category.
    pub async fn subcategories_for(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ChoiceItem>, CashFlowError> {
        self.choices(CatalogKind::SubCategory, Some(category_id.into_inner()))
            .await
    }

    /// Resolves a category together with its operation type.
    pub async fn category(&self, id: CategoryId) -> Result<Category, CashFlowError> {
        let entry = self.get(CatalogKind::Category, id.into_inner()).await?;
        entry.as_category().ok_or(CashFlowError::CatalogNotFound {
            kind: CatalogKind::Category,
            id: id.into_inner(),
        })
    }

    /// Resolves a subcategory together with its category.
    pub async fn sub_category(&self, id: SubCategoryId) -> Result<SubCategory, CashFlowError> {
        let entry = self.get(CatalogKind::SubCategory, id.into_inner()).await?;
        entry.as_sub_category().ok_or(CashFlowError::CatalogNotFound {
            kind: CatalogKind::SubCategory,
            id: id.into_inner(),
        })
    }

    /// Fails with `CatalogNotFound` unless the entry exists.
    pub async fn ensure_exists(&self, kind: CatalogKind, id: Uuid) -> Result<(), CashFlowError> {
        self.get(kind, id).await.map(|_| ())
    }
}
