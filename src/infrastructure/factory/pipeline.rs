//! Highlights pipeline factory.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::tokenizer::Gpt2Tokenizer;
use crate::application::highlight::{HighlightGenerator, HighlightsPipeline};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::llm::Llm;
use crate::port::outbound::tokenizer::TokenCounter;

/// Wire a pipeline around `llm` with the GPT-2 token counter.
///
/// # Errors
///
/// Returns [`Error::Tokenizer`](crate::error::Error::Tokenizer) if the
/// vocabulary fails to load.
pub fn build_pipeline(config: &Config, llm: Arc<dyn Llm>) -> Result<HighlightsPipeline> {
    let tokenizer = Gpt2Tokenizer::new()?;
    Ok(build_pipeline_with(config, llm, Arc::new(tokenizer)))
}

/// Wire a pipeline from explicit parts.
#[must_use]
pub fn build_pipeline_with(
    config: &Config,
    llm: Arc<dyn Llm>,
    tokenizer: Arc<dyn TokenCounter>,
) -> HighlightsPipeline {
    debug!(
        vocabulary = tokenizer.vocabulary(),
        max_attempts = config.generation.max_attempts,
        timeout_secs = config.generation.timeout_secs,
        "Building highlights pipeline"
    );
    let generator = HighlightGenerator::new(
        llm,
        tokenizer,
        config.generation.clone(),
        config.pricing.pricing(),
    );
    HighlightsPipeline::new(
        generator,
        config.llm.model.clone(),
        config.comparison.total_placement,
    )
}
