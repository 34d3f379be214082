//! Exponential backoff with jitter between generation attempts.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::config::GenerationConfig;

/// Delay schedule for one week pair's retries.
#[derive(Debug, Clone)]
pub struct Backoff {
    current_delay_ms: u64,
    max_delay_ms: u64,
    multiplier: f64,
}

impl Backoff {
    #[must_use]
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            current_delay_ms: config.initial_delay_ms,
            max_delay_ms: config.max_delay_ms,
            multiplier: config.backoff_multiplier,
        }
    }

    /// Delay before the next attempt; grows the base delay for the one after.
    pub fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let delay = base_delay + Duration::from_millis(jitter_ms(base_delay));

        let next = (self.current_delay_ms as f64 * self.multiplier) as u64;
        self.current_delay_ms = next.min(self.max_delay_ms);

        delay
    }
}

/// Up to 20% of `base_delay`, seeded from the clock.
fn jitter_ms(base_delay: Duration) -> u64 {
    let range_ms = (base_delay.as_millis() as u64) / 5;
    if range_ms == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (range_ms + 1)
}
