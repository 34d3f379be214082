//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::application::highlight::GenerationConfig;
use crate::infrastructure::config::settings::Config;

/// Generation config with zero backoff delays and three attempts.
pub fn generation() -> GenerationConfig {
    GenerationConfig {
        max_attempts: 3,
        initial_delay_ms: 0,
        max_delay_ms: 0,
        backoff_multiplier: 1.0,
        timeout_secs: 5,
        max_concurrency: 1,
    }
}

/// Generation config allowing `max_concurrency` calls in flight.
pub fn concurrent_generation(max_concurrency: usize) -> GenerationConfig {
    GenerationConfig {
        max_concurrency,
        ..generation()
    }
}

/// Full application config with test-friendly generation settings.
pub fn config() -> Config {
    Config {
        generation: generation(),
        ..Config::default()
    }
}
