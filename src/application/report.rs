//! Per-week view for presentation: totals, store breakdown, highlight.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::money::round_fixed;
use crate::domain::{HighlightIndex, Sales, SalesDataset, SalesRecord, StoreId};

/// Shown when a week has no highlight text.
pub const FALLBACK_HIGHLIGHT: &str = "No additional information available.";

/// One store's sales in the selected week and the week before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreBreakdown {
    pub store: StoreId,
    pub current_week_sales: Sales,
    pub previous_week_sales: Sales,
}

/// Everything a dashboard shows for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekReport {
    pub week: NaiveDate,
    /// The preceding distinct week, or `week` itself for the first week.
    pub previous_week: NaiveDate,
    pub total_current: Sales,
    pub total_previous: Sales,
    /// Total change in percent, two places; zero when last week sold nothing.
    pub variation_pct: Decimal,
    pub stores: Vec<StoreBreakdown>,
    pub highlight: String,
    /// False when `highlight` is the fallback text.
    pub has_highlight: bool,
}

impl WeekReport {
    /// Build the report for `week`.
    ///
    /// Stores missing from one of the two weeks show zero for that week.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingWeekData`] if `week` has no records, or
    /// [`DomainError::SalesOverflow`] if a total or the percentage does not
    /// fit in a [`Decimal`].
    pub fn build(
        dataset: &SalesDataset,
        highlights: &HighlightIndex,
        week: NaiveDate,
    ) -> Result<Self, DomainError> {
        let current = dataset.records_on(week);
        if current.is_empty() {
            return Err(DomainError::MissingWeekData { week });
        }
        let previous_week = dataset.previous_week(week).unwrap_or(week);
        let previous = dataset.records_on(previous_week);

        let mut by_store: BTreeMap<StoreId, (Sales, Sales)> = BTreeMap::new();
        // One record per store and date, so each slot is set at most once.
        for record in current {
            by_store.entry(record.store()).or_default().0 = record.weekly_sales();
        }
        for record in previous {
            by_store.entry(record.store()).or_default().1 = record.weekly_sales();
        }

        let overflow = || DomainError::SalesOverflow {
            current: week,
            previous: previous_week,
        };
        let total_current = checked_total(current).ok_or_else(overflow)?;
        let total_previous = checked_total(previous).ok_or_else(overflow)?;
        let variation_pct = if total_previous.is_zero() {
            Decimal::ZERO
        } else {
            total_current
                .checked_sub(total_previous)
                .and_then(|change| change.checked_div(total_previous))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|pct| round_fixed(pct, 2))
                .ok_or_else(overflow)?
        };

        let highlight = highlights.get(week);

        Ok(Self {
            week,
            previous_week,
            total_current,
            total_previous,
            variation_pct,
            stores: by_store
                .into_iter()
                .map(|(store, (current, previous))| StoreBreakdown {
                    store,
                    current_week_sales: current,
                    previous_week_sales: previous,
                })
                .collect(),
            highlight: highlight.unwrap_or(FALLBACK_HIGHLIGHT).to_string(),
            has_highlight: highlight.is_some(),
        })
    }
}

fn checked_total(records: &[SalesRecord]) -> Option<Sales> {
    records
        .iter()
        .try_fold(Decimal::ZERO, |total, record| total.checked_add(record.weekly_sales()))
}

/// Weeks a dashboard can select: every week after the first.
#[must_use]
pub fn selectable_weeks(dataset: &SalesDataset) -> Vec<NaiveDate> {
    dataset.weeks_ascending().into_iter().skip(1).collect()
}
