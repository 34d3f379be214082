//! Domain validation errors for sales data and week comparisons.
//!
//! Dataset-level errors ([`DataFormatError`], [`DomainError::DuplicateRecord`])
//! are fatal and abort a run before any processing. Week-level errors
//! ([`DomainError::MissingWeekData`], [`DomainError::NoSharedStores`],
//! [`DomainError::SalesOverflow`]) only affect a single week pair.
//!
//! # Examples
//!
//! ```
//! use weeklight::domain::error::{DataFormatError, DomainError};
//! use weeklight::domain::{DatasetOptions, RawTable, SalesDataset};
//!
//! let table = RawTable::new(vec!["Store".into(), "Weekly_Sales".into()], vec![]);
//! let result = SalesDataset::load(&table, &DatasetOptions::default());
//!
//! assert!(matches!(
//!     result,
//!     Err(DomainError::DataFormat(DataFormatError::MissingColumn { column: "Date" }))
//! ));
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use super::id::StoreId;

/// Malformed input rows or columns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataFormatError {
    /// A required column is absent from the header row.
    #[error("missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// A date cell does not match the configured format.
    #[error("row {row}: cannot parse date '{value}' with format '{format}'")]
    InvalidDate {
        /// 1-based data row number (header excluded).
        row: usize,
        /// The offending cell.
        value: String,
        /// The expected `chrono` format string.
        format: String,
    },

    /// A numeric cell could not be parsed.
    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidNumber {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Column the cell belongs to.
        column: &'static str,
        /// The offending cell.
        value: String,
    },

    /// A data row has fewer cells than the header.
    #[error("row {row}: expected {expected} cells, found {found}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors that occur when dataset or comparison invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    /// More than one record exists for the same store and date.
    #[error("duplicate record for store {store} on {date}")]
    DuplicateRecord {
        /// Store with the duplicate.
        store: StoreId,
        /// Date with the duplicate.
        date: NaiveDate,
    },

    /// A requested week has no records at all.
    #[error("no sales records for week {week}")]
    MissingWeekData {
        /// The empty week.
        week: NaiveDate,
    },

    /// The week is the earliest in the dataset, so nothing precedes it.
    #[error("no week precedes {week}")]
    NoPreviousWeek { week: NaiveDate },

    /// Both weeks have records but no store appears in both.
    #[error("weeks {current} and {previous} have no store in common")]
    NoSharedStores {
        current: NaiveDate,
        previous: NaiveDate,
    },

    /// A total or variation falls outside the range a decimal can hold.
    #[error("sales figures for weeks {current} and {previous} exceed the decimal range")]
    SalesOverflow {
        current: NaiveDate,
        previous: NaiveDate,
    },
}
