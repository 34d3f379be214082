//! Turns a comparison summary into a one-paragraph highlight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use super::config::GenerationConfig;
use super::retry::Backoff;
use crate::domain::{HighlightRecord, Pricing, TokenUsage, WeekPair};
use crate::error::GenerationError;
use crate::port::outbound::llm::{CompletionRequest, Llm};
use crate::port::outbound::tokenizer::TokenCounter;

/// Sampling temperature for every highlight request.
pub const TEMPERATURE: f64 = 0.0;

/// Calls the text-generation service with retries, then prices the result.
pub struct HighlightGenerator {
    llm: Arc<dyn Llm>,
    tokenizer: Arc<dyn TokenCounter>,
    config: GenerationConfig,
    pricing: Pricing,
}

impl HighlightGenerator {
    #[must_use]
    pub fn new(
        llm: Arc<dyn Llm>,
        tokenizer: Arc<dyn TokenCounter>,
        config: GenerationConfig,
        pricing: Pricing,
    ) -> Self {
        Self {
            llm,
            tokenizer,
            config,
            pricing,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Wrap a summary in the highlight instructions.
    #[must_use]
    pub fn build_prompt(summary: &str) -> String {
        format!(
            r"You write the weekly sales highlight for a retail dashboard.

## Week-over-week changes
{summary}

## Output
Reply with exactly two sentences in this shape, filling in the figures:
Total sales {{increased|decreased}} by ($X) (Y%). The {{increase|decrease}} was driven mainly by a change of ($X2) (Y2%) in store N.

Rules:
- Use only the figures given above
- Store N is the store with the largest absolute change
- No preamble, no extra sentences"
        )
    }

    /// Generate the highlight for one week pair.
    ///
    /// The completion is kept verbatim. Token counts cover the full prompt
    /// and the completion.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Exhausted`] once every attempt has failed
    /// or timed out, and [`GenerationError::Cancelled`] when `shutdown`
    /// reads `true` before the next attempt starts.
    pub async fn generate(
        &self,
        pair: WeekPair,
        summary: &str,
        model: &str,
        shutdown: watch::Receiver<bool>,
    ) -> Result<HighlightRecord, GenerationError> {
        let request = CompletionRequest {
            model: model.to_string(),
            prompt: Self::build_prompt(summary),
            temperature: TEMPERATURE,
        };

        let text = self.complete_with_retry(&request, pair, shutdown).await?;

        let usage = TokenUsage::new(
            self.tokenizer.count_tokens(&request.prompt),
            self.tokenizer.count_tokens(&text),
        );
        let cost = self.pricing.cost(usage);
        debug!(
            week = %pair.current,
            provider = self.llm.name(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            cost_usd = %cost,
            "Highlight generated"
        );

        Ok(HighlightRecord::generated(pair, text, usage, cost))
    }

    async fn complete_with_retry(
        &self,
        request: &CompletionRequest,
        pair: WeekPair,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<String, GenerationError> {
        let attempts = self.config.max_attempts.max(1);
        let call_timeout = Duration::from_secs(self.config.timeout_secs);
        let mut backoff = Backoff::new(&self.config);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            if *shutdown.borrow() {
                return Err(GenerationError::Cancelled {
                    attempts: attempt - 1,
                });
            }
            match timeout(call_timeout, self.llm.complete(request)).await {
                Ok(Ok(text)) if !text.trim().is_empty() => return Ok(text),
                Ok(Ok(_)) => last_error = GenerationError::EmptyCompletion.to_string(),
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error = GenerationError::Timeout {
                        secs: self.config.timeout_secs,
                    }
                    .to_string();
                }
            }

            if attempt < attempts {
                let delay = backoff.next_delay();
                warn!(
                    week = %pair.current,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "Generation attempt failed, retrying"
                );
                tokio::select! {
                    () = sleep(delay) => {}
                    () = shutdown_requested(&mut shutdown) => {
                        return Err(GenerationError::Cancelled { attempts: attempt });
                    }
                }
            }
        }

        Err(GenerationError::Exhausted {
            attempts,
            last_error,
        })
    }
}

/// Resolves once `shutdown` reads `true`. A dropped sender never resolves.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HighlightStatus;
    use crate::testkit;
    use crate::testkit::llm::{ScriptedLlm, Step, WordCounter};
    use rust_decimal_macros::dec;

    const HIGHLIGHT: &str = "Total sales increased by ($100) (6.67%). The increase was driven \
                             mainly by a change of ($200) (20.00%) in store 1.";

    fn generator(llm: Arc<ScriptedLlm>, config: GenerationConfig) -> HighlightGenerator {
        HighlightGenerator::new(llm, Arc::new(WordCounter), config, Pricing::default())
    }

    fn pair() -> WeekPair {
        WeekPair {
            current: testkit::domain::week(2),
            previous: testkit::domain::week(1),
        }
    }

    fn running() -> watch::Receiver<bool> {
        let (_tx, rx) = watch::channel(false);
        rx
    }

    #[test]
    fn prompt_embeds_summary_and_shape() {
        let prompt = HighlightGenerator::build_prompt("Total sales changed by 100 dollars.");
        assert!(prompt.contains("Total sales changed by 100 dollars."));
        assert!(prompt.contains(
            "Total sales {increased|decreased} by ($X) (Y%). The {increase|decrease} was \
             driven mainly by a change of ($X2) (Y2%) in store N."
        ));
    }

    #[tokio::test]
    async fn success_records_usage_and_cost() {
        let llm = Arc::new(ScriptedLlm::replying(HIGHLIGHT));
        let generator = generator(llm.clone(), testkit::config::generation());

        let record = generator
            .generate(pair(), "summary text", "gpt-3.5-turbo", running())
            .await
            .unwrap();

        assert_eq!(record.status, HighlightStatus::Generated);
        assert_eq!(record.highlight_text, HIGHLIGHT);
        assert_eq!(record.week, pair().current);
        assert_eq!(record.previous_week, pair().previous);

        let prompt = HighlightGenerator::build_prompt("summary text");
        let expected = TokenUsage::new(
            prompt.split_whitespace().count() as u64,
            HIGHLIGHT.split_whitespace().count() as u64,
        );
        assert_eq!(record.token_usage, expected);
        assert_eq!(record.cost_usd, Pricing::default().cost(expected));

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gpt-3.5-turbo");
        assert_eq!(calls[0].temperature, 0.0);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let llm = Arc::new(
            ScriptedLlm::replying(HIGHLIGHT)
                .then(Step::Fail("503 Service Unavailable".into()))
                .then(Step::Fail("503 Service Unavailable".into())),
        );
        let generator = generator(llm.clone(), testkit::config::generation());

        let record = generator.generate(pair(), "summary", "m", running()).await.unwrap();

        assert_eq!(record.highlight_text, HIGHLIGHT);
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_last_error() {
        let llm = Arc::new(
            ScriptedLlm::replying(HIGHLIGHT)
                .then(Step::Fail("first".into()))
                .then(Step::Fail("second".into()))
                .then(Step::Fail("third".into())),
        );
        let generator = generator(llm.clone(), testkit::config::generation());

        let err = generator.generate(pair(), "summary", "m", running()).await.unwrap_err();

        match err {
            GenerationError::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("third"), "last_error = {last_error}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn empty_completion_counts_as_failure() {
        let llm = Arc::new(ScriptedLlm::replying(HIGHLIGHT).then(Step::Reply("  ".into())));
        let generator = generator(llm.clone(), testkit::config::generation());

        let record = generator.generate(pair(), "summary", "m", running()).await.unwrap();

        assert_eq!(record.highlight_text, HIGHLIGHT);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_time_out() {
        let llm = Arc::new(
            ScriptedLlm::replying(HIGHLIGHT)
                .then(Step::Delay(Duration::from_secs(120), HIGHLIGHT.into())),
        );
        let config = GenerationConfig {
            max_attempts: 1,
            timeout_secs: 5,
            ..testkit::config::generation()
        };
        let generator = generator(llm, config);

        let err = generator.generate(pair(), "summary", "m", running()).await.unwrap_err();

        assert_eq!(
            err,
            GenerationError::Exhausted {
                attempts: 1,
                last_error: "generation request timed out after 5s".into(),
            }
        );
    }

    #[tokio::test]
    async fn custom_pricing_applies() {
        let llm = Arc::new(ScriptedLlm::replying("one two three four"));
        let pricing = Pricing {
            prompt_rate_per_million: dec!(0),
            completion_rate_per_million: dec!(1000000),
        };
        let generator = HighlightGenerator::new(
            llm,
            Arc::new(WordCounter),
            testkit::config::generation(),
            pricing,
        );

        let record = generator.generate(pair(), "summary", "m", running()).await.unwrap();

        assert_eq!(record.token_usage.completion_tokens, 4);
        assert_eq!(record.cost_usd, dec!(4));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_during_backoff_stops_retrying() {
        let (tx, rx) = watch::channel(false);
        let llm = Arc::new(
            ScriptedLlm::replying(HIGHLIGHT)
                .then(Step::Fail("503 Service Unavailable".into()))
                .on_call(move |call| {
                    if call == 1 {
                        let _ = tx.send(true);
                    }
                }),
        );
        let config = GenerationConfig {
            initial_delay_ms: 60_000,
            max_delay_ms: 60_000,
            ..testkit::config::generation()
        };
        let generator = generator(llm.clone(), config);

        let err = generator.generate(pair(), "summary", "m", rx).await.unwrap_err();

        assert_eq!(err, GenerationError::Cancelled { attempts: 1 });
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn shutdown_before_first_attempt_makes_no_call() {
        let (_tx, rx) = watch::channel(true);
        let llm = Arc::new(ScriptedLlm::replying(HIGHLIGHT));
        let generator = generator(llm.clone(), testkit::config::generation());

        let err = generator.generate(pair(), "summary", "m", rx).await.unwrap_err();

        assert_eq!(err, GenerationError::Cancelled { attempts: 0 });
        assert_eq!(llm.call_count(), 0);
    }
}
