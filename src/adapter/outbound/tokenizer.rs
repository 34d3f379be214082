//! BPE token counter backed by `tiktoken-rs`.

use std::sync::Arc;

use tiktoken_rs::{r50k_base, CoreBPE};

use crate::error::{Error, Result};
use crate::port::outbound::tokenizer::TokenCounter;

/// Counts tokens with the GPT-2 (`r50k_base`) vocabulary.
#[derive(Clone)]
pub struct Gpt2Tokenizer {
    bpe: Arc<CoreBPE>,
}

impl Gpt2Tokenizer {
    /// Load the vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenizer`] if the embedded vocabulary fails to load.
    pub fn new() -> Result<Self> {
        let bpe = r50k_base().map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }
}

impl TokenCounter for Gpt2Tokenizer {
    fn vocabulary(&self) -> &'static str {
        "r50k_base"
    }

    fn count_tokens(&self, text: &str) -> u64 {
        self.bpe.encode_ordinary(text).len() as u64
    }
}
