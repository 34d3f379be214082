//! Text-generation service adapters.
//!
//! Provides the [`Llm`](crate::port::outbound::llm::Llm) implementation for
//! OpenAI-compatible chat completion endpoints.

pub mod openai;
