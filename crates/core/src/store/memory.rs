//! In-memory store for tests and batch-import dry runs.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use cashflow_shared::types::CashFlowId;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CashFlowStore, CatalogStore, StoreResult};
use crate::cashflow::CashFlow;
use crate::catalog::{CatalogEntry, CatalogKind};
use crate::error::CashFlowError;
use crate::query::CashFlowQuery;
use crate::validation::{ValidationError, names_match};

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<Uuid, CatalogEntry>,
    records: BTreeMap<CashFlowId, CashFlow>,
}

impl State {
    fn entry(&self, kind: CatalogKind, id: Uuid) -> Option<&CatalogEntry> {
        self.entries.get(&id).filter(|entry| entry.kind == kind)
    }

    fn require(&self, kind: CatalogKind, id: Uuid) -> StoreResult<&CatalogEntry> {
        self.entry(kind, id)
            .ok_or(CashFlowError::CatalogNotFound { kind, id })
    }

    fn check_name_free(&self, candidate: &CatalogEntry) -> StoreResult<()> {
        let clash = self.entries.values().any(|entry| {
            entry.kind == candidate.kind
                && entry.parent_id == candidate.parent_id
                && entry.id != candidate.id
                && names_match(&entry.name, &candidate.name)
        });
        if clash {
            return Err(ValidationError::DuplicateName {
                kind: candidate.kind,
                name: candidate.name.clone(),
                scope: candidate.scope()?,
            }
            .into());
        }
        Ok(())
    }

    /// The entry and all of its transitive children.
    fn subtree(&self, kind: CatalogKind, id: Uuid) -> Vec<(CatalogKind, Uuid)> {
        let mut collected = vec![(kind, id)];
        let mut cursor = 0;
        while let Some(&(parent_kind, parent_id)) = collected.get(cursor) {
            if let Some(child_kind) = parent_kind.child_kind() {
                collected.extend(
                    self.entries
                        .values()
                        .filter(|e| e.kind == child_kind && e.parent_id == Some(parent_id))
                        .map(|e| (e.kind, e.id)),
                );
            }
            cursor += 1;
        }
        collected
    }

    fn is_referenced(&self, kind: CatalogKind, id: Uuid) -> bool {
        self.records.values().any(|record| match kind {
            CatalogKind::Status => record.status_id.into_inner() == id,
            CatalogKind::OperationType => record.operation_type_id.into_inner() == id,
            CatalogKind::Category => record.category_id.into_inner() == id,
            CatalogKind::SubCategory => record.subcategory_id.into_inner() == id,
        })
    }

    fn check_references(&self, record: &CashFlow) -> StoreResult<()> {
        self.require(CatalogKind::Status, record.status_id.into_inner())?;
        self.require(
            CatalogKind::OperationType,
            record.operation_type_id.into_inner(),
        )?;
        self.require(CatalogKind::Category, record.category_id.into_inner())?;
        self.require(CatalogKind::SubCategory, record.subcategory_id.into_inner())?;
        Ok(())
    }
}

/// Store keeping catalog entries and records in memory.
///
/// Enforces the same uniqueness, reference, cascade and protect rules as
/// the database schema.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn find_entry(&self, kind: CatalogKind, id: Uuid) -> StoreResult<Option<CatalogEntry>> {
        Ok(self.state.read().await.entry(kind, id).cloned())
    }

    async fn list_entries(
        &self,
        kind: CatalogKind,
        parent_id: Option<Uuid>,
    ) -> StoreResult<Vec<CatalogEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<CatalogEntry> = state
            .entries
            .values()
            .filter(|entry| entry.kind == kind)
            .filter(|entry| parent_id.is_none() || entry.parent_id == parent_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    async fn insert_entry(&self, entry: &CatalogEntry) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let scope = entry.scope()?;
        if let (Some(parent_kind), Some(parent_id)) = (entry.kind.parent_kind(), scope.parent_id())
        {
            state.require(parent_kind, parent_id)?;
        }
        state.check_name_free(entry)?;
        state.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn rename_entry(&self, kind: CatalogKind, id: Uuid, name: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let mut renamed = state.require(kind, id)?.clone();
        renamed.name = name.to_string();
        state.check_name_free(&renamed)?;
        state.entries.insert(id, renamed);
        Ok(())
    }

    async fn delete_entry(&self, kind: CatalogKind, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.require(kind, id)?;

        let subtree = state.subtree(kind, id);
        if subtree
            .iter()
            .any(|&(node_kind, node_id)| state.is_referenced(node_kind, node_id))
        {
            return Err(CashFlowError::ReferentialIntegrity { kind, id });
        }

        let doomed: HashSet<Uuid> = subtree.into_iter().map(|(_, node_id)| node_id).collect();
        state.entries.retain(|entry_id, _| !doomed.contains(entry_id));
        Ok(())
    }
}

#[async_trait]
impl CashFlowStore for InMemoryStore {
    async fn find_record(&self, id: CashFlowId) -> StoreResult<Option<CashFlow>> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn list_records(&self, query: &CashFlowQuery) -> StoreResult<Vec<CashFlow>> {
        let state = self.state.read().await;
        Ok(query.apply(state.records.values().cloned()))
    }

    async fn insert_record(&self, record: &CashFlow) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.check_references(record)?;
        state.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update_record(&self, record: &CashFlow) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.records.contains_key(&record.id) {
            return Err(CashFlowError::CashFlowNotFound(record.id));
        }
        state.check_references(record)?;
        state.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn delete_record(&self, id: CashFlowId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(CashFlowError::CashFlowNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_shared::types::{CategoryId, OperationTypeId, StatusId, SubCategoryId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct Tree {
        status: CatalogEntry,
        operation_type: CatalogEntry,
        category: CatalogEntry,
        subcategory: CatalogEntry,
    }

    async fn seed(store: &InMemoryStore) -> Tree {
        let status = CatalogEntry::new(CatalogKind::Status, "Business", None);
        let operation_type = CatalogEntry::new(CatalogKind::OperationType, "Write-off", None);
        let category = CatalogEntry::new(
            CatalogKind::Category,
            "Infrastructure",
            Some(operation_type.id),
        );
        let subcategory = CatalogEntry::new(CatalogKind::SubCategory, "VPS", Some(category.id));
        for entry in [&status, &operation_type, &category, &subcategory] {
            store.insert_entry(entry).await.unwrap();
        }
        Tree {
            status,
            operation_type,
            category,
            subcategory,
        }
    }

    fn record_for(tree: &Tree) -> CashFlow {
        CashFlow {
            id: CashFlowId::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status_id: StatusId::from_uuid(tree.status.id),
            operation_type_id: OperationTypeId::from_uuid(tree.operation_type.id),
            category_id: CategoryId::from_uuid(tree.category.id),
            subcategory_id: SubCategoryId::from_uuid(tree.subcategory.id),
            amount: dec!(100.00),
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_in_scope() {
        let store = InMemoryStore::new();
        let tree = seed(&store).await;

        let duplicate = CatalogEntry::new(CatalogKind::SubCategory, "vps", Some(tree.category.id));
        let err = store.insert_entry(&duplicate).await.unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_NAME");

        let other = CatalogEntry::new(
            CatalogKind::Category,
            "Marketing",
            Some(tree.operation_type.id),
        );
        store.insert_entry(&other).await.unwrap();
        let same_name_elsewhere =
            CatalogEntry::new(CatalogKind::SubCategory, "VPS", Some(other.id));
        store.insert_entry(&same_name_elsewhere).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_requires_existing_parent() {
        let store = InMemoryStore::new();
        let orphan = CatalogEntry::new(CatalogKind::Category, "Ads", Some(Uuid::now_v7()));
        let err = store.insert_entry(&orphan).await.unwrap_err();
        assert!(matches!(
            err,
            CashFlowError::CatalogNotFound {
                kind: CatalogKind::OperationType,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let store = InMemoryStore::new();
        for name in ["tax", "Business", "personal"] {
            store
                .insert_entry(&CatalogEntry::new(CatalogKind::Status, name, None))
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .list_entries(CatalogKind::Status, None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Business", "personal", "tax"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_when_unreferenced() {
        let store = InMemoryStore::new();
        let tree = seed(&store).await;

        store
            .delete_entry(CatalogKind::OperationType, tree.operation_type.id)
            .await
            .unwrap();

        assert!(
            store
                .find_entry(CatalogKind::Category, tree.category.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .find_entry(CatalogKind::SubCategory, tree.subcategory.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .find_entry(CatalogKind::Status, tree.status.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_delete_refused_while_descendant_is_referenced() {
        let store = InMemoryStore::new();
        let tree = seed(&store).await;
        store.insert_record(&record_for(&tree)).await.unwrap();

        let err = store
            .delete_entry(CatalogKind::Category, tree.category.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CashFlowError::ReferentialIntegrity {
                kind: CatalogKind::Category,
                ..
            }
        ));
        assert!(
            store
                .find_entry(CatalogKind::SubCategory, tree.subcategory.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_record_references_must_exist() {
        let store = InMemoryStore::new();
        let tree = seed(&store).await;
        let mut record = record_for(&tree);
        record.status_id = StatusId::new();

        let err = store.insert_record(&record).await.unwrap_err();
        assert!(matches!(
            err,
            CashFlowError::CatalogNotFound {
                kind: CatalogKind::Status,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_record() {
        let store = InMemoryStore::new();
        let tree = seed(&store).await;
        let record = record_for(&tree);

        assert!(matches!(
            store.update_record(&record).await,
            Err(CashFlowError::CashFlowNotFound(_))
        ));
        assert!(matches!(
            store.delete_record(record.id).await,
            Err(CashFlowError::CashFlowNotFound(_))
        ));
    }
}
