//! Token counting port.

/// Counts tokens over a fixed vocabulary.
///
/// The same vocabulary must be used for every call in a run so prompt and
/// completion counts are comparable across weeks.
pub trait TokenCounter: Send + Sync {
    /// Vocabulary name for logging.
    fn vocabulary(&self) -> &'static str;

    /// Number of tokens in `text`.
    fn count_tokens(&self, text: &str) -> u64;
}
