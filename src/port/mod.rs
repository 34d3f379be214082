//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the text-generation service, the tokenizer).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌──────────┐                                         ┌─────────────┐
//! │   LLM    │                                         │  Tokenizer  │
//! │ Adapter  │                                         │   Adapter   │
//! └──────────┘                                         └─────────────┘
//! ```

pub mod outbound;
