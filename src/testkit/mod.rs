//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`llm`] - Scripted [`Llm`](crate::port::outbound::llm::Llm) and a
//!   whitespace [`TokenCounter`](crate::port::outbound::tokenizer::TokenCounter).
//! - [`domain`] - Builders for dates, records and datasets.
//! - [`config`] - Canonical test configurations with zero delays.

pub mod config;
pub mod domain;
pub mod llm;
