//! Cash-flow service - submit, update and query records.
//!
//! Every write goes through the same pipeline:
//! 1. Resolve status, operation type, category and subcategory
//! 2. Run the record policy (field rules, category and operation type ties)
//! 3. Persist in a single store call
//!
//! A rejected record is never written.

use std::sync::Arc;

use cashflow_shared::types::CashFlowId;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::policy::{CashFlowPolicy, ResolvedReferences};
use super::types::{CashFlow, CashFlowInput};
use crate::catalog::{CatalogKind, CatalogService};
use crate::clock::Clock;
use crate::error::CashFlowError;
use crate::query::{CashFlowQuery, CashFlowSort, DateRange};
use crate::store::{CashFlowStore, CatalogStore};
use crate::validation::{CashFlowFields, ValidationError, validate_all};

/// Service for cash-flow records.
#[derive(Clone)]
pub struct CashFlowService {
    catalog: CatalogService,
    records: Arc<dyn CashFlowStore>,
    clock: Arc<dyn Clock>,
}

impl CashFlowService {
    /// Creates a service over the given stores and clock.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        records: Arc<dyn CashFlowStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog: CatalogService::new(catalog),
            records,
            clock,
        }
    }

    /// Today's date according to the service clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validates a partially filled form without touching the store.
    pub fn validate_fields(&self, fields: &CashFlowFields) -> Result<CashFlowFields, ValidationError> {
        validate_all(fields, self.today())
    }

    /// Validates and stores a new record, returning its id.
    ///
    /// # Errors
    ///
    /// - `CatalogNotFound` when a referenced entry does not exist
    /// - `Validation` for any field or relation rule
    /// - `Database` when the store fails
    pub async fn submit(&self, input: CashFlowInput) -> Result<CashFlowId, CashFlowError> {
        let record = match self.prepare(CashFlowId::new(), &input).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error_code = err.error_code(), "Cash-flow submission rejected");
                return Err(err);
            }
        };

        self.records.insert_record(&record).await?;

        info!(
            id = %record.id,
            date = %record.date,
            amount = %record.amount,
            "Cash-flow record created"
        );
        Ok(record.id)
    }

    /// Replaces an existing record after running the same checks as `submit`.
    ///
    /// # Errors
    ///
    /// `CashFlowNotFound` for an unknown id, otherwise as for `submit`.
    pub async fn update(
        &self,
        id: CashFlowId,
        input: CashFlowInput,
    ) -> Result<CashFlow, CashFlowError> {
        self.get(id).await?;

        let record = match self.prepare(id, &input).await {
            Ok(record) => record,
            Err(err) => {
                warn!(id = %id, error_code = err.error_code(), "Cash-flow update rejected");
                return Err(err);
            }
        };

        self.records.update_record(&record).await?;

        info!(id = %id, "Cash-flow record updated");
        Ok(record)
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// `CashFlowNotFound` for an unknown id.
    pub async fn delete(&self, id: CashFlowId) -> Result<(), CashFlowError> {
        self.records.delete_record(id).await?;
        info!(id = %id, "Cash-flow record deleted");
        Ok(())
    }

    /// Fetches a single record.
    ///
    /// # Errors
    ///
    /// `CashFlowNotFound` for an unknown id.
    pub async fn get(&self, id: CashFlowId) -> Result<CashFlow, CashFlowError> {
        debug!(id = %id, "Looking up cash-flow record");
        self.records
            .find_record(id)
            .await?
            .ok_or(CashFlowError::CashFlowNotFound(id))
    }

    /// Lists records matching a query.
    pub async fn list(&self, query: &CashFlowQuery) -> Result<Vec<CashFlow>, CashFlowError> {
        self.records.list_records(query).await
    }

    /// All records dated within `[start, end]`, newest first.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`.
    pub async fn period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CashFlow>, CashFlowError> {
        let query = CashFlowQuery::new()
            .with_range(DateRange::period(start, end)?)
            .with_sort(CashFlowSort::default());
        self.list(&query).await
    }

    /// The catalog this service resolves references against.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    async fn prepare(&self, id: CashFlowId, input: &CashFlowInput) -> Result<CashFlow, CashFlowError> {
        let references = self.resolve(input).await?;
        let checked = CashFlowPolicy::check(input, &references, self.today())?;
        Ok(CashFlow::from_input(id, checked))
    }

    async fn resolve(&self, input: &CashFlowInput) -> Result<ResolvedReferences, CashFlowError> {
        self.catalog
            .ensure_exists(CatalogKind::Status, input.status_id.into_inner())
            .await?;
        self.catalog
            .ensure_exists(
                CatalogKind::OperationType,
                input.operation_type_id.into_inner(),
            )
            .await?;
        let category = self.catalog.category(input.category_id).await?;
        let subcategory = self.catalog.sub_category(input.subcategory_id).await?;
        Ok(ResolvedReferences {
            category,
            subcategory,
        })
    }
}
