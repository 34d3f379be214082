//! Weeklight - week-over-week store sales comparison with generated highlights.
//!
//! Reads a weekly sales table, compares every week with the one before it,
//! asks a text-generation service for a short highlight per week, and writes
//! the dataset back out with the highlights appended.
//!
//! # Architecture
//!
//! - [`domain`] - Sales records, comparison tables, summary text, highlight
//!   records. Pure and synchronous.
//! - [`port`] - Traits for the text-generation service and token counting.
//! - [`adapter`] - CSV input/output, the OpenAI-compatible client, the GPT-2
//!   tokenizer, and the command line.
//! - [`application`] - The highlights pipeline (retry, timeout, bounded
//!   concurrency, cancellation) and the per-week report.
//! - [`infrastructure`] - Configuration and wiring.
//!
//! # Example
//!
//! ```no_run
//! use weeklight::domain::{ComparisonTable, TotalPlacement};
//! use weeklight::domain::format_summary;
//! # fn demo(dataset: &weeklight::domain::SalesDataset) -> Result<(), weeklight::domain::error::DomainError> {
//! let pair = dataset.week_pairs()[0];
//! let table = ComparisonTable::for_pair(dataset, pair, TotalPlacement::Sorted)?;
//! println!("{}", format_summary(&table));
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
