//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: text generation
//! and token counting.

pub mod llm;
pub mod tokenizer;
