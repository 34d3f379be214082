//! Sales domain: records, week comparisons, summaries and highlights.
//!
//! Everything here is pure and synchronous. Network and file access live in
//! the adapter layer; orchestration lives in the application layer.

pub mod comparison;
pub mod dataset;
pub mod error;
pub mod highlight;
pub mod id;
pub mod money;
pub mod summary;

pub use comparison::{ChangeType, ComparisonRow, ComparisonTable, RowKind, TotalPlacement};
pub use dataset::{DatasetOptions, RawTable, SalesDataset, SalesRecord, WeekPair};
pub use highlight::{
    HighlightIndex, HighlightRecord, HighlightStatus, HighlightedRow, Pricing, TokenUsage,
};
pub use id::StoreId;
pub use money::{Sales, Usd};
pub use summary::format_summary;
