//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured components
//! from application configuration.
//!
//! # Submodules
//!
//! - [`llm`] - Text-generation client construction
//! - [`pipeline`] - Highlights pipeline wiring

pub mod llm;
pub mod pipeline;
