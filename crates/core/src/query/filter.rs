//! Filtering and sorting of cash-flow listings.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cashflow::CashFlow;
use crate::error::CashFlowError;

/// Inclusive date range; an absent bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included.
    pub start: Option<NaiveDate>,
    /// Last date included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range with optional bounds.
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Creates a closed period `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `start > end`.
    pub fn period(start: NaiveDate, end: NaiveDate) -> Result<Self, CashFlowError> {
        if start > end {
            return Err(CashFlowError::InvalidDateRange { start, end });
        }
        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    /// Returns true if `date` lies within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Field a listing is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Transaction date.
    #[default]
    Date,
    /// Transaction amount.
    Amount,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

/// Listing order. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSort {
    /// Field to sort by.
    pub field: SortField,
    /// Direction.
    pub direction: SortDirection,
}

/// Error returned when a sort key is not one of the accepted forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort key '{0}', expected one of: date, -date, amount, -amount")]
pub struct UnknownSortKey(pub String);

impl CashFlowSort {
    /// Creates a sort order.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Parses a sort key, falling back to the default order for anything
    /// unrecognized (including an absent key).
    #[must_use]
    pub fn parse_or_default(key: Option<&str>) -> Self {
        key.and_then(|key| key.parse().ok()).unwrap_or_default()
    }

    /// Returns the textual key: `date`, `-date`, `amount` or `-amount`.
    #[must_use]
    pub const fn as_key(&self) -> &'static str {
        match (self.field, self.direction) {
            (SortField::Date, SortDirection::Ascending) => "date",
            (SortField::Date, SortDirection::Descending) => "-date",
            (SortField::Amount, SortDirection::Ascending) => "amount",
            (SortField::Amount, SortDirection::Descending) => "-amount",
        }
    }

    /// Orders two records; ties on the sort field are broken by id.
    #[must_use]
    pub fn compare(&self, left: &CashFlow, right: &CashFlow) -> Ordering {
        let by_field = match self.field {
            SortField::Date => left.date.cmp(&right.date),
            SortField::Amount => left.amount.cmp(&right.amount),
        };
        let by_field = match self.direction {
            SortDirection::Ascending => by_field,
            SortDirection::Descending => by_field.reverse(),
        };
        by_field.then_with(|| left.id.cmp(&right.id))
    }
}

impl FromStr for CashFlowSort {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, field) = match s.trim().strip_prefix('-') {
            Some(field) => (SortDirection::Descending, field),
            None => (SortDirection::Ascending, s.trim()),
        };
        let field = match field {
            "date" => SortField::Date,
            "amount" => SortField::Amount,
            _ => return Err(UnknownSortKey(s.to_string())),
        };
        Ok(Self::new(field, direction))
    }
}

impl std::fmt::Display for CashFlowSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// A cash-flow listing request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowQuery {
    /// Date filter.
    #[serde(default)]
    pub range: DateRange,
    /// Ordering.
    #[serde(default)]
    pub sort: CashFlowSort,
}

impl CashFlowQuery {
    /// Creates a query that returns everything, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to a date range.
    #[must_use]
    pub const fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: CashFlowSort) -> Self {
        self.sort = sort;
        self
    }

    /// Filters and orders records held in memory.
    #[must_use]
    pub fn apply<I>(&self, records: I) -> Vec<CashFlow>
    where
        I: IntoIterator<Item = CashFlow>,
    {
        let mut matching: Vec<CashFlow> = records
            .into_iter()
            .filter(|record| self.range.contains(record.date))
            .collect();
        matching.sort_by(|left, right| self.sort.compare(left, right));
        matching
    }
}
