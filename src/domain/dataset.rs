//! Typed weekly sales dataset.
//!
//! [`SalesDataset::load`] turns an untyped [`RawTable`] into validated
//! [`SalesRecord`]s. Records are held sorted by `(date, store)` so every
//! per-week lookup is a contiguous slice.

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{DataFormatError, DomainError};
use super::id::StoreId;
use super::money::Sales;

/// Header of the store number column.
pub const STORE_COLUMN: &str = "Store";
/// Header of the week-ending date column.
pub const DATE_COLUMN: &str = "Date";
/// Header of the weekly sales column.
pub const SALES_COLUMN: &str = "Weekly_Sales";

/// Untyped tabular input: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn column(&self, name: &'static str) -> Result<usize, DataFormatError> {
        self.headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or(DataFormatError::MissingColumn { column: name })
    }
}

/// Date layout of the source file, e.g. `05-02-2010`.
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Stores numbered at or above this are dropped on load.
pub const DEFAULT_STORE_THRESHOLD: u32 = 6;

/// Options controlling how raw rows become records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOptions {
    /// `chrono` format of the date column.
    pub date_format: String,
    /// Rows whose store number is at or above this value are dropped.
    pub store_threshold: u32,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.into(),
            store_threshold: DEFAULT_STORE_THRESHOLD,
        }
    }
}

/// One store's sales for one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    store: StoreId,
    date: NaiveDate,
    weekly_sales: Sales,
    cells: Vec<String>,
}

impl SalesRecord {
    /// Build a record without any pass-through cells.
    #[must_use]
    pub fn new(store: StoreId, date: NaiveDate, weekly_sales: Sales) -> Self {
        Self {
            store,
            date,
            weekly_sales,
            cells: Vec::new(),
        }
    }

    #[must_use]
    pub const fn store(&self) -> StoreId {
        self.store
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn weekly_sales(&self) -> Sales {
        self.weekly_sales
    }

    /// The original input cells, in header order. Empty for records built
    /// with [`SalesRecord::new`].
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// A `(current, previous)` pair of consecutive distinct weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekPair {
    pub current: NaiveDate,
    pub previous: NaiveDate,
}

/// Validated sales records indexed by week.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    headers: Vec<String>,
    records: Vec<SalesRecord>,
    weeks: BTreeMap<NaiveDate, Range<usize>>,
}

impl SalesDataset {
    /// Parse and validate a raw table.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DataFormat`] when a required column is missing
    /// or a cell cannot be parsed, and [`DomainError::DuplicateRecord`] when
    /// a store appears twice for the same date.
    pub fn load(table: &RawTable, options: &DatasetOptions) -> Result<Self, DomainError> {
        let store_col = table.column(STORE_COLUMN)?;
        let date_col = table.column(DATE_COLUMN)?;
        let sales_col = table.column(SALES_COLUMN)?;
        let width = table.headers.len();

        let mut records = Vec::with_capacity(table.rows.len());
        let mut seen = HashSet::new();
        let mut dropped = 0usize;

        for (index, row) in table.rows.iter().enumerate() {
            let row_number = index + 1;
            if row.len() < width {
                return Err(DataFormatError::ShortRow {
                    row: row_number,
                    expected: width,
                    found: row.len(),
                }
                .into());
            }

            let store = parse_store(&row[store_col], row_number)?;
            if store.get() >= options.store_threshold {
                dropped += 1;
                continue;
            }

            let raw_date = row[date_col].trim();
            let date = NaiveDate::parse_from_str(raw_date, &options.date_format).map_err(|_| {
                DataFormatError::InvalidDate {
                    row: row_number,
                    value: raw_date.to_string(),
                    format: options.date_format.clone(),
                }
            })?;
            let weekly_sales = parse_sales(&row[sales_col], row_number)?;

            if !seen.insert((store, date)) {
                return Err(DomainError::DuplicateRecord { store, date });
            }

            records.push(SalesRecord {
                store,
                date,
                weekly_sales,
                cells: row.clone(),
            });
        }

        debug!(
            kept = records.len(),
            dropped,
            threshold = options.store_threshold,
            "Loaded sales rows"
        );

        Ok(Self::from_parts(table.headers.clone(), records))
    }

    /// Build a dataset from already-typed records.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateRecord`] when a store appears twice
    /// for the same date.
    pub fn from_records(records: Vec<SalesRecord>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert((record.store, record.date)) {
                return Err(DomainError::DuplicateRecord {
                    store: record.store,
                    date: record.date,
                });
            }
        }
        let headers = vec![
            STORE_COLUMN.to_string(),
            DATE_COLUMN.to_string(),
            SALES_COLUMN.to_string(),
        ];
        let records = records
            .into_iter()
            .map(|mut record| {
                if record.cells.is_empty() {
                    record.cells = vec![
                        record.store.to_string(),
                        record.date.format(DEFAULT_DATE_FORMAT).to_string(),
                        record.weekly_sales.to_string(),
                    ];
                }
                record
            })
            .collect();
        Ok(Self::from_parts(headers, records))
    }

    fn from_parts(headers: Vec<String>, mut records: Vec<SalesRecord>) -> Self {
        records.sort_by_key(|record| (record.date, record.store));

        let mut weeks: BTreeMap<NaiveDate, Range<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            weeks
                .entry(record.date)
                .and_modify(|range| range.end = index + 1)
                .or_insert(index..index + 1);
        }

        Self {
            headers,
            records,
            weeks,
        }
    }

    /// Original input headers, in order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of the date column within [`headers`](Self::headers).
    #[must_use]
    pub fn date_column(&self) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.trim() == DATE_COLUMN)
    }

    /// All records, ordered by date then store.
    #[must_use]
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct dates in ascending order.
    #[must_use]
    pub fn weeks_ascending(&self) -> Vec<NaiveDate> {
        self.weeks.keys().copied().collect()
    }

    /// Records for exactly `date`, ordered by store. Empty when absent.
    #[must_use]
    pub fn records_on(&self, date: NaiveDate) -> &[SalesRecord] {
        self.weeks
            .get(&date)
            .map_or(&[][..], |range| &self.records[range.clone()])
    }

    /// Every `(week[i], week[i-1])` pair for `i` in `1..week_count`.
    #[must_use]
    pub fn week_pairs(&self) -> Vec<WeekPair> {
        let weeks = self.weeks_ascending();
        weeks
            .windows(2)
            .map(|window| WeekPair {
                current: window[1],
                previous: window[0],
            })
            .collect()
    }

    /// The distinct week immediately before `week`, if any.
    #[must_use]
    pub fn previous_week(&self, week: NaiveDate) -> Option<NaiveDate> {
        self.weeks.range(..week).next_back().map(|(date, _)| *date)
    }
}

fn parse_store(cell: &str, row: usize) -> Result<StoreId, DataFormatError> {
    let value = cell.trim();
    match value.parse::<u32>() {
        Ok(id) if id >= 1 => Ok(StoreId::new(id)),
        _ => Err(DataFormatError::InvalidNumber {
            row,
            column: STORE_COLUMN,
            value: value.to_string(),
        }),
    }
}

fn parse_sales(cell: &str, row: usize) -> Result<Sales, DataFormatError> {
    let value = cell.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| DataFormatError::InvalidNumber {
            row,
            column: SALES_COLUMN,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table(rows: &[[&str; 4]]) -> RawTable {
        RawTable::new(
            vec![
                "Store".into(),
                "Date".into(),
                "Weekly_Sales".into(),
                "Holiday_Flag".into(),
            ],
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn load_parses_rows_and_orders_weeks() {
        let dataset = SalesDataset::load(
            &table(&[
                ["2", "12-02-2010", "500.5", "1"],
                ["1", "05-02-2010", "1643690.90", "0"],
                ["1", "12-02-2010", "1641957.44", "1"],
            ]),
            &DatasetOptions::default(),
        )
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.weeks_ascending(),
            vec![date(2010, 2, 5), date(2010, 2, 12)]
        );

        let second = dataset.records_on(date(2010, 2, 12));
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].store(), StoreId::new(1));
        assert_eq!(second[1].store(), StoreId::new(2));
        assert_eq!(second[1].weekly_sales(), dec!(500.5));
        assert_eq!(second[1].cells()[3], "1");
    }

    #[test]
    fn load_drops_stores_at_or_above_threshold() {
        let dataset = SalesDataset::load(
            &table(&[
                ["5", "05-02-2010", "10", "0"],
                ["6", "05-02-2010", "20", "0"],
                ["45", "05-02-2010", "30", "0"],
            ]),
            &DatasetOptions::default(),
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].store(), StoreId::new(5));
    }

    #[test]
    fn load_rejects_missing_column() {
        let raw = RawTable::new(vec!["Store".into(), "Date".into()], vec![]);
        let err = SalesDataset::load(&raw, &DatasetOptions::default()).unwrap_err();
        assert_eq!(
            err,
            DomainError::DataFormat(DataFormatError::MissingColumn {
                column: "Weekly_Sales"
            })
        );
    }

    #[test]
    fn load_rejects_date_in_wrong_format() {
        let err = SalesDataset::load(
            &table(&[["1", "2010-02-05", "10", "0"]]),
            &DatasetOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DomainError::DataFormat(DataFormatError::InvalidDate { row: 1, .. })
        ));
    }

    #[test]
    fn load_rejects_non_numeric_sales() {
        let err = SalesDataset::load(
            &table(&[["1", "05-02-2010", "n/a", "0"]]),
            &DatasetOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DomainError::DataFormat(DataFormatError::InvalidNumber {
                column: "Weekly_Sales",
                ..
            })
        ));
    }

    #[test]
    fn load_rejects_store_zero() {
        let err = SalesDataset::load(
            &table(&[["0", "05-02-2010", "10", "0"]]),
            &DatasetOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DomainError::DataFormat(DataFormatError::InvalidNumber {
                column: "Store",
                ..
            })
        ));
    }

    #[test]
    fn load_rejects_duplicate_store_week() {
        let err = SalesDataset::load(
            &table(&[
                ["1", "05-02-2010", "10", "0"],
                ["1", "05-02-2010", "11", "0"],
            ]),
            &DatasetOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            DomainError::DuplicateRecord {
                store: StoreId::new(1),
                date: date(2010, 2, 5),
            }
        );
    }

    #[test]
    fn duplicate_above_threshold_is_ignored() {
        let dataset = SalesDataset::load(
            &table(&[
                ["9", "05-02-2010", "10", "0"],
                ["9", "05-02-2010", "11", "0"],
            ]),
            &DatasetOptions::default(),
        )
        .unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn load_rejects_short_row() {
        let raw = RawTable::new(
            vec!["Store".into(), "Date".into(), "Weekly_Sales".into()],
            vec![vec!["1".into(), "05-02-2010".into()]],
        );
        let err = SalesDataset::load(&raw, &DatasetOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::DataFormat(DataFormatError::ShortRow { row: 1, .. })
        ));
    }

    #[test]
    fn week_pairs_are_consecutive_current_then_previous() {
        let dataset = SalesDataset::from_records(vec![
            SalesRecord::new(StoreId::new(1), date(2023, 1, 20), dec!(3)),
            SalesRecord::new(StoreId::new(1), date(2023, 1, 6), dec!(1)),
            SalesRecord::new(StoreId::new(1), date(2023, 1, 13), dec!(2)),
        ])
        .unwrap();

        let pairs = dataset.week_pairs();
        assert_eq!(
            pairs,
            vec![
                WeekPair {
                    current: date(2023, 1, 13),
                    previous: date(2023, 1, 6),
                },
                WeekPair {
                    current: date(2023, 1, 20),
                    previous: date(2023, 1, 13),
                },
            ]
        );
    }

    #[test]
    fn single_week_has_no_pairs() {
        let dataset = SalesDataset::from_records(vec![SalesRecord::new(
            StoreId::new(1),
            date(2023, 1, 6),
            dec!(1),
        )])
        .unwrap();
        assert!(dataset.week_pairs().is_empty());
    }

    #[test]
    fn records_on_unknown_date_is_empty() {
        let dataset = SalesDataset::default();
        assert!(dataset.records_on(date(2023, 1, 6)).is_empty());
    }

    #[test]
    fn previous_week_finds_preceding_distinct_date() {
        let dataset = SalesDataset::from_records(vec![
            SalesRecord::new(StoreId::new(1), date(2023, 1, 6), dec!(1)),
            SalesRecord::new(StoreId::new(2), date(2023, 1, 6), dec!(1)),
            SalesRecord::new(StoreId::new(1), date(2023, 1, 13), dec!(2)),
        ])
        .unwrap();

        assert_eq!(dataset.previous_week(date(2023, 1, 13)), Some(date(2023, 1, 6)));
        assert_eq!(dataset.previous_week(date(2023, 1, 6)), None);
    }
}
