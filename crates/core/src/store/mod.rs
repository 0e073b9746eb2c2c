//! # Store contract
//!
//! Persistence traits the catalog and cash-flow services run against.
//! Implementations must enforce the same constraints the database schema
//! does, so the service-level checks stay pre-checks:
//!
//! - one `(kind, scope, lower(name))` per entry, reported as `DuplicateName`
//! - parents and record references must exist (`CatalogNotFound`)
//! - deleting a catalog entry cascades to its children and is refused with
//!   `ReferentialIntegrity` while a record references the entry or any of
//!   its descendants
//!
//! Each write is atomic.

pub mod memory;

use async_trait::async_trait;
use cashflow_shared::types::CashFlowId;
use uuid::Uuid;

use crate::cashflow::CashFlow;
use crate::catalog::{CatalogEntry, CatalogKind};
use crate::error::CashFlowError;
use crate::query::CashFlowQuery;

pub use memory::InMemoryStore;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, CashFlowError>;

/// Storage of catalog entries.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Looks up an entry by kind and id.
    async fn find_entry(&self, kind: CatalogKind, id: Uuid) -> StoreResult<Option<CatalogEntry>>;

    /// Lists entries of `kind`, restricted to children of `parent_id` when
    /// given. Ordered by lowercase name, then id.
    async fn list_entries(
        &self,
        kind: CatalogKind,
        parent_id: Option<Uuid>,
    ) -> StoreResult<Vec<CatalogEntry>>;

    /// Inserts a new entry.
    async fn insert_entry(&self, entry: &CatalogEntry) -> StoreResult<()>;

    /// Changes the name of an existing entry.
    async fn rename_entry(&self, kind: CatalogKind, id: Uuid, name: &str) -> StoreResult<()>;

    /// Deletes an entry together with its children.
    async fn delete_entry(&self, kind: CatalogKind, id: Uuid) -> StoreResult<()>;
}

/// Storage of cash-flow records.
#[async_trait]
pub trait CashFlowStore: Send + Sync {
    /// Looks up a record by id.
    async fn find_record(&self, id: CashFlowId) -> StoreResult<Option<CashFlow>>;

    /// Lists records matching the query, in the query's order.
    async fn list_records(&self, query: &CashFlowQuery) -> StoreResult<Vec<CashFlow>>;

    /// Inserts a new record.
    async fn insert_record(&self, record: &CashFlow) -> StoreResult<()>;

    /// Replaces an existing record.
    async fn update_record(&self, record: &CashFlow) -> StoreResult<()>;

    /// Deletes a record.
    async fn delete_record(&self, id: CashFlowId) -> StoreResult<()>;
}
