//! Highlight generation use case.
//!
//! - [`generator`] calls the text-generation service for one week pair,
//!   with retries and a per-call timeout.
//! - [`pipeline`] runs the generator across every consecutive week pair
//!   and merges the records back onto the dataset.

pub mod config;
pub mod generator;
pub mod pipeline;
pub mod retry;

pub use config::GenerationConfig;
pub use generator::HighlightGenerator;
pub use pipeline::{merge, HighlightsPipeline, PipelineRun, RunSummary};
