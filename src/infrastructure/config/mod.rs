//! Infrastructure configuration modules.

pub mod dataset;
pub mod llm;
pub mod logging;
pub mod pricing;
pub mod settings;

pub use settings::Config;
