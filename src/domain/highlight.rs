//! Per-week highlight records, token usage, and service pricing.

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dataset::{SalesRecord, WeekPair};
use super::money::Usd;

/// Token counts for one generation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    #[must_use]
    pub const fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    #[must_use]
    pub const fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

impl Add for TokenUsage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            prompt_tokens: self.prompt_tokens + rhs.prompt_tokens,
            completion_tokens: self.completion_tokens + rhs.completion_tokens,
        }
    }
}

impl Sum for TokenUsage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Per-million-token prices of the text-generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub prompt_rate_per_million: Usd,
    pub completion_rate_per_million: Usd,
}

impl Pricing {
    /// Cost in dollars of a call with the given usage.
    #[must_use]
    pub fn cost(&self, usage: TokenUsage) -> Usd {
        let million = Decimal::from(1_000_000u32);
        Decimal::from(usage.prompt_tokens) * self.prompt_rate_per_million / million
            + Decimal::from(usage.completion_tokens) * self.completion_rate_per_million / million
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            prompt_rate_per_million: Decimal::new(50, 2),
            completion_rate_per_million: Decimal::new(150, 2),
        }
    }
}

/// Outcome of producing a highlight for one week pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum HighlightStatus {
    /// The service returned a highlight.
    Generated,
    /// The service call failed after all retries.
    Failed(String),
    /// The pair could not be compared (missing or disjoint week data, or
    /// figures too large to compare).
    Skipped(String),
}

impl HighlightStatus {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Failed(_) => "failed",
            Self::Skipped(_) => "skipped",
        }
    }

    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated)
    }
}

impl fmt::Display for HighlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated => f.write_str("generated"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

/// The highlight produced for one week, compared with the week before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRecord {
    pub week: NaiveDate,
    pub previous_week: NaiveDate,
    /// Service output, verbatim. Empty unless `status` is generated.
    pub highlight_text: String,
    pub token_usage: TokenUsage,
    pub cost_usd: Usd,
    pub status: HighlightStatus,
}

impl HighlightRecord {
    /// A successfully generated highlight.
    #[must_use]
    pub fn generated(
        pair: WeekPair,
        highlight_text: String,
        token_usage: TokenUsage,
        cost_usd: Usd,
    ) -> Self {
        Self {
            week: pair.current,
            previous_week: pair.previous,
            highlight_text,
            token_usage,
            cost_usd,
            status: HighlightStatus::Generated,
        }
    }

    /// A pair whose generation call failed.
    #[must_use]
    pub fn failed(pair: WeekPair, reason: impl Into<String>) -> Self {
        Self::marker(pair, HighlightStatus::Failed(reason.into()))
    }

    /// A pair that could not be compared.
    #[must_use]
    pub fn skipped(pair: WeekPair, reason: impl Into<String>) -> Self {
        Self::marker(pair, HighlightStatus::Skipped(reason.into()))
    }

    fn marker(pair: WeekPair, status: HighlightStatus) -> Self {
        Self {
            week: pair.current,
            previous_week: pair.previous,
            highlight_text: String::new(),
            token_usage: TokenUsage::default(),
            cost_usd: Decimal::ZERO,
            status,
        }
    }
}

/// A sales record joined with the highlight for its week, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightedRow<'a> {
    pub record: &'a SalesRecord,
    pub highlight: Option<&'a HighlightRecord>,
}

/// Highlight text per week, as read back from a persisted artifact.
///
/// When a week appears more than once the first non-empty text wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightIndex {
    by_week: BTreeMap<NaiveDate, String>,
}

impl HighlightIndex {
    /// Highlight text for `week`; `None` when absent or empty.
    #[must_use]
    pub fn get(&self, week: NaiveDate) -> Option<&str> {
        self.by_week
            .get(&week)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_week.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_week.is_empty()
    }
}

impl FromIterator<(NaiveDate, String)> for HighlightIndex {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        let mut by_week = BTreeMap::new();
        for (week, text) in iter {
            let slot: &mut String = by_week.entry(week).or_default();
            if slot.is_empty() {
                *slot = text;
            }
        }
        Self { by_week }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_tokens_is_prompt_plus_completion() {
        assert_eq!(TokenUsage::new(120, 35).total_tokens(), 155);
    }

    #[test]
    fn default_pricing_matches_published_rates() {
        let pricing = Pricing::default();
        assert_eq!(pricing.prompt_rate_per_million, dec!(0.50));
        assert_eq!(pricing.completion_rate_per_million, dec!(1.50));
    }

    #[test]
    fn cost_applies_per_million_rates() {
        let cost = Pricing::default().cost(TokenUsage::new(1_000_000, 2_000_000));
        assert_eq!(cost, dec!(3.50));

        let small = Pricing::default().cost(TokenUsage::new(200, 40));
        assert_eq!(small, dec!(0.00016));
    }

    #[test]
    fn custom_rates_are_honoured() {
        let pricing = Pricing {
            prompt_rate_per_million: dec!(10),
            completion_rate_per_million: dec!(30),
        };
        assert_eq!(pricing.cost(TokenUsage::new(1000, 1000)), dec!(0.04));
    }

    #[test]
    fn usage_sums() {
        let total: TokenUsage = [TokenUsage::new(1, 2), TokenUsage::new(3, 4)]
            .into_iter()
            .sum();
        assert_eq!(total, TokenUsage::new(4, 6));
    }

    #[test]
    fn failed_record_carries_no_text_or_cost() {
        let pair = WeekPair {
            current: NaiveDate::from_ymd_opt(2023, 1, 13).unwrap(),
            previous: NaiveDate::from_ymd_opt(2023, 1, 6).unwrap(),
        };
        let record = HighlightRecord::failed(pair, "timeout");
        assert!(record.highlight_text.is_empty());
        assert_eq!(record.cost_usd, Decimal::ZERO);
        assert_eq!(record.status.label(), "failed");
        assert_eq!(record.status.to_string(), "failed: timeout");
    }

    #[test]
    fn first_non_empty_text_per_week_wins() {
        let index: HighlightIndex = [
            (NaiveDate::from_ymd_opt(2010, 2, 12).unwrap(), String::new()),
            (NaiveDate::from_ymd_opt(2010, 2, 12).unwrap(), "first".to_string()),
            (NaiveDate::from_ymd_opt(2010, 2, 12).unwrap(), "second".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            index.get(NaiveDate::from_ymd_opt(2010, 2, 12).unwrap()),
            Some("first")
        );
    }
}
