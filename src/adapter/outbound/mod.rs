//! Outbound adapters (driven side).

pub mod csv;
pub mod llm;
pub mod tokenizer;
