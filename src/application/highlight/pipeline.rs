//! Week-pair orchestration: compare, summarize, generate, merge.
//!
//! Every consecutive week pair flows through [`ComparisonTable`] →
//! [`format_summary`] → [`HighlightGenerator`]. Pairs run under a semaphore
//! of `max_concurrency` permits and land in a slot keyed by their index, so
//! records always come back in ascending week order.

use std::collections::HashMap;

use chrono::NaiveDate;
use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn};

use super::generator::HighlightGenerator;
use crate::error::GenerationError;
use crate::domain::{
    format_summary, ComparisonTable, HighlightRecord, HighlightedRow, SalesDataset, TokenUsage,
    TotalPlacement, Usd, WeekPair,
};

/// Runs the highlight generator over every consecutive week pair.
pub struct HighlightsPipeline {
    generator: HighlightGenerator,
    model: String,
    placement: TotalPlacement,
}

impl HighlightsPipeline {
    #[must_use]
    pub fn new(
        generator: HighlightGenerator,
        model: impl Into<String>,
        placement: TotalPlacement,
    ) -> Self {
        Self {
            generator,
            model: model.into(),
            placement,
        }
    }

    /// Produce one record per week pair, ascending by week.
    ///
    /// Once `shutdown` reads `true` no further generation calls start,
    /// retries included. Calls already in flight finish. Pairs that never
    /// started or were cut off between retries produce no record and the
    /// run is flagged as cancelled.
    pub async fn run(
        &self,
        dataset: &SalesDataset,
        shutdown: watch::Receiver<bool>,
    ) -> PipelineRun {
        self.run_with_progress(dataset, shutdown, |_, _, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_record(record, done, total)` as
    /// each pair finishes.
    pub async fn run_with_progress<F>(
        &self,
        dataset: &SalesDataset,
        shutdown: watch::Receiver<bool>,
        mut on_record: F,
    ) -> PipelineRun
    where
        F: FnMut(&HighlightRecord, usize, usize),
    {
        let pairs = dataset.week_pairs();
        let total = pairs.len();
        let max_concurrency = self.generator.config().max_concurrency.max(1);
        let semaphore = Semaphore::new(max_concurrency);

        info!(
            pairs = total,
            max_concurrency,
            model = %self.model,
            "Generating weekly highlights"
        );

        let mut tasks = FuturesUnordered::new();
        for (index, pair) in pairs.into_iter().enumerate() {
            let semaphore = &semaphore;
            let shutdown = shutdown.clone();
            tasks.push(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return (index, None);
                };
                if *shutdown.borrow() {
                    return (index, None);
                }
                (index, self.process(dataset, pair, shutdown).await)
            });
        }

        let mut slots: Vec<Option<HighlightRecord>> = vec![None; total];
        let mut done = 0;
        while let Some((index, record)) = tasks.next().await {
            if let Some(record) = record {
                done += 1;
                on_record(&record, done, total);
                slots[index] = Some(record);
            }
        }

        let cancelled = slots.iter().any(Option::is_none);
        let run = PipelineRun {
            pairs_total: total,
            records: slots.into_iter().flatten().collect(),
            cancelled,
        };

        let summary = run.summary();
        if cancelled {
            warn!(
                completed = summary.completed,
                pairs = total,
                "Highlights run cancelled"
            );
        }
        info!(
            generated = summary.generated,
            failed = summary.failed,
            skipped = summary.skipped,
            total_tokens = summary.total_tokens,
            cost_usd = %summary.cost_usd,
            "Highlights run complete"
        );

        run
    }

    /// `None` when shutdown interrupted the pair before it produced a record.
    async fn process(
        &self,
        dataset: &SalesDataset,
        pair: WeekPair,
        shutdown: watch::Receiver<bool>,
    ) -> Option<HighlightRecord> {
        let table = match ComparisonTable::for_pair(dataset, pair, self.placement) {
            Ok(table) => table,
            Err(e) => {
                warn!(
                    week = %pair.current,
                    previous = %pair.previous,
                    error = %e,
                    "Skipping week pair"
                );
                return Some(HighlightRecord::skipped(pair, e.to_string()));
            }
        };
        let summary = format_summary(&table);

        match self
            .generator
            .generate(pair, &summary, &self.model, shutdown)
            .await
        {
            Ok(record) => Some(record),
            Err(GenerationError::Cancelled { attempts }) => {
                warn!(week = %pair.current, attempts, "Highlight generation cancelled");
                None
            }
            Err(e) => {
                error!(week = %pair.current, error = %e, "Highlight generation failed");
                Some(HighlightRecord::failed(pair, e.to_string()))
            }
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    /// Records for every pair that ran, ascending by week.
    pub records: Vec<HighlightRecord>,
    /// Set when some pairs never started.
    pub cancelled: bool,
    /// Number of consecutive week pairs in the dataset.
    pub pairs_total: usize,
}

impl PipelineRun {
    /// Summed token usage across all records.
    #[must_use]
    pub fn usage(&self) -> TokenUsage {
        self.records.iter().map(|record| record.token_usage).sum()
    }

    /// Summed cost across all records.
    #[must_use]
    pub fn cost(&self) -> Usd {
        self.records.iter().map(|record| record.cost_usd).sum()
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let count = |label: &str| {
            self.records
                .iter()
                .filter(|record| record.status.label() == label)
                .count()
        };
        let usage = self.usage();
        RunSummary {
            pairs: self.pairs_total,
            completed: self.records.len(),
            generated: count("generated"),
            failed: count("failed"),
            skipped: count("skipped"),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens(),
            cost_usd: self.cost(),
            cancelled: self.cancelled,
        }
    }
}

/// Counts and totals of a run, for logs and terminal output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub pairs: usize,
    pub completed: usize,
    pub generated: usize,
    pub failed: usize,
    pub skipped: usize,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub cost_usd: Usd,
    pub cancelled: bool,
}

/// Left-join records onto every sales row sharing their week.
///
/// Rows keep the dataset order (date, then store). Rows of the earliest
/// week, and of any week without a record, carry no highlight.
#[must_use]
pub fn merge<'a>(
    dataset: &'a SalesDataset,
    records: &'a [HighlightRecord],
) -> Vec<HighlightedRow<'a>> {
    let by_week: HashMap<NaiveDate, &HighlightRecord> =
        records.iter().map(|record| (record.week, record)).collect();

    dataset
        .records()
        .iter()
        .map(|record| HighlightedRow {
            record,
            highlight: by_week.get(&record.date()).copied(),
        })
        .collect()
}
