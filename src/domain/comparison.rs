//! Week-over-week comparison table.
//!
//! [`ComparisonTable::build`] pivots two weeks of records into one row per
//! store plus a synthetic Total row, then derives absolute and percentage
//! variation and a change direction for every row.
//!
//! # Rounding
//!
//! - `variation_abs` is rounded to whole dollars.
//! - `variation_pct` is computed from the *rounded* `variation_abs` and
//!   rounded to two places. It is zero whenever the previous week is zero.
//!
//! Both use banker's rounding.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dataset::{SalesDataset, WeekPair};
use super::error::DomainError;
use super::id::StoreId;
use super::money::{round_fixed, Sales};

/// Identifies what a [`ComparisonRow`] aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "store", rename_all = "snake_case")]
pub enum RowKind {
    /// Sum over every store included in the table.
    Total,
    /// A single store.
    Store(StoreId),
}

impl RowKind {
    #[must_use]
    pub const fn is_total(self) -> bool {
        matches!(self, Self::Total)
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total => write!(f, "Total"),
            Self::Store(id) => write!(f, "{id}"),
        }
    }
}

/// Direction of a week-over-week change. Zero change counts as a decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increase,
    Decrease,
}

impl ChangeType {
    /// Classify a variation: strictly positive is an increase.
    #[must_use]
    pub fn of(variation: Decimal) -> Self {
        if variation > Decimal::ZERO {
            Self::Increase
        } else {
            Self::Decrease
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the Total row lands in the final ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalPlacement {
    /// Sorted with the store rows by its own current-week sum.
    #[default]
    Sorted,
    /// Pinned to the first position, store rows sorted after it.
    First,
}

/// One row of a [`ComparisonTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub kind: RowKind,
    pub previous_week_sales: Sales,
    pub current_week_sales: Sales,
    pub variation_abs: Decimal,
    pub variation_pct: Decimal,
    pub change_type: ChangeType,
}

impl ComparisonRow {
    /// Derive the variation metrics for a pair of sales figures.
    ///
    /// Returns `None` when the variation or percentage overflows [`Decimal`].
    #[must_use]
    pub fn checked(
        kind: RowKind,
        previous_week_sales: Sales,
        current_week_sales: Sales,
    ) -> Option<Self> {
        let variation_abs = round_fixed(current_week_sales.checked_sub(previous_week_sales)?, 0);
        let variation_pct = if previous_week_sales.is_zero() {
            round_fixed(Decimal::ZERO, 2)
        } else {
            let ratio = variation_abs.checked_div(previous_week_sales)?;
            round_fixed(ratio.checked_mul(Decimal::ONE_HUNDRED)?, 2)
        };

        Some(Self {
            kind,
            previous_week_sales,
            current_week_sales,
            variation_abs,
            variation_pct,
            change_type: ChangeType::of(variation_abs),
        })
    }
}

/// Per-store and total comparison between two weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub current_week: NaiveDate,
    pub previous_week: NaiveDate,
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Build the comparison for `current_week` against `previous_week`.
    ///
    /// Stores present in only one of the two weeks are left out of both the
    /// store rows and the Total.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingWeekData`] if either week has no
    /// records, [`DomainError::NoSharedStores`] if no store has records
    /// in both weeks, or [`DomainError::SalesOverflow`] if a total or
    /// variation does not fit in a [`Decimal`].
    pub fn build(
        dataset: &SalesDataset,
        current_week: NaiveDate,
        previous_week: NaiveDate,
        placement: TotalPlacement,
    ) -> Result<Self, DomainError> {
        let current = dataset.records_on(current_week);
        if current.is_empty() {
            return Err(DomainError::MissingWeekData { week: current_week });
        }
        let previous = dataset.records_on(previous_week);
        if previous.is_empty() {
            return Err(DomainError::MissingWeekData {
                week: previous_week,
            });
        }

        let previous_by_store: BTreeMap<StoreId, Sales> = previous
            .iter()
            .map(|record| (record.store(), record.weekly_sales()))
            .collect();

        let overflow = || DomainError::SalesOverflow {
            current: current_week,
            previous: previous_week,
        };
        let mut store_rows = Vec::with_capacity(current.len());
        let mut previous_total = Decimal::ZERO;
        let mut current_total = Decimal::ZERO;

        for record in current {
            let Some(&previous_sales) = previous_by_store.get(&record.store()) else {
                debug!(
                    store = %record.store(),
                    week = %previous_week,
                    "Store missing from previous week, excluded"
                );
                continue;
            };
            previous_total = previous_total
                .checked_add(previous_sales)
                .ok_or_else(overflow)?;
            current_total = current_total
                .checked_add(record.weekly_sales())
                .ok_or_else(overflow)?;
            let row = ComparisonRow::checked(
                RowKind::Store(record.store()),
                previous_sales,
                record.weekly_sales(),
            )
            .ok_or_else(overflow)?;
            store_rows.push(row);
        }

        if store_rows.is_empty() {
            return Err(DomainError::NoSharedStores {
                current: current_week,
                previous: previous_week,
            });
        }

        let total = ComparisonRow::checked(RowKind::Total, previous_total, current_total)
            .ok_or_else(overflow)?;
        let rows = order_rows(total, store_rows, placement);

        Ok(Self {
            current_week,
            previous_week,
            rows,
        })
    }

    /// Build the comparison for a consecutive week pair.
    ///
    /// # Errors
    ///
    /// See [`ComparisonTable::build`].
    pub fn for_pair(
        dataset: &SalesDataset,
        pair: WeekPair,
        placement: TotalPlacement,
    ) -> Result<Self, DomainError> {
        Self::build(dataset, pair.current, pair.previous, placement)
    }

    /// Rows in presentation order.
    #[must_use]
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    /// The Total row, wherever it was sorted to.
    #[must_use]
    pub fn total(&self) -> &ComparisonRow {
        self.rows
            .iter()
            .find(|row| row.kind.is_total())
            .unwrap_or(&self.rows[0])
    }

    /// Store rows in presentation order, Total excluded.
    pub fn stores(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|row| !row.kind.is_total())
    }
}

fn order_rows(
    total: ComparisonRow,
    mut stores: Vec<ComparisonRow>,
    placement: TotalPlacement,
) -> Vec<ComparisonRow> {
    let by_current_desc =
        |a: &ComparisonRow, b: &ComparisonRow| b.current_week_sales.cmp(&a.current_week_sales);

    match placement {
        TotalPlacement::Sorted => {
            let mut rows = Vec::with_capacity(stores.len() + 1);
            rows.push(total);
            rows.append(&mut stores);
            rows.sort_by(by_current_desc);
            rows
        }
        TotalPlacement::First => {
            stores.sort_by(by_current_desc);
            let mut rows = Vec::with_capacity(stores.len() + 1);
            rows.push(total);
            rows.append(&mut stores);
            rows
        }
    }
}
