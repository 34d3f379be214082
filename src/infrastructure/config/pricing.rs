//! Per-million-token service rates.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Pricing, Usd};

/// Dollar rates used to price each generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PricingConfig {
    /// Dollars per million prompt tokens. Defaults to 0.50.
    #[serde(default = "default_prompt_rate")]
    pub prompt_rate_per_million: Usd,
    /// Dollars per million completion tokens. Defaults to 1.50.
    #[serde(default = "default_completion_rate")]
    pub completion_rate_per_million: Usd,
}

impl PricingConfig {
    #[must_use]
    pub const fn pricing(&self) -> Pricing {
        Pricing {
            prompt_rate_per_million: self.prompt_rate_per_million,
            completion_rate_per_million: self.completion_rate_per_million,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            prompt_rate_per_million: default_prompt_rate(),
            completion_rate_per_million: default_completion_rate(),
        }
    }
}

fn default_prompt_rate() -> Usd {
    Decimal::new(50, 2)
}

fn default_completion_rate() -> Usd {
    Decimal::new(150, 2)
}
