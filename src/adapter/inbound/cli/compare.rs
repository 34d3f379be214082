//! Handler for the `compare` command.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use super::command::{Cli, CompareArgs};
use super::context::{init_logging, load_config, load_dataset};
use super::output;
use crate::domain::error::DomainError;
use crate::domain::{format_summary, ChangeType, ComparisonRow, ComparisonTable};
use crate::error::Result;

#[derive(Tabled, Serialize)]
struct CompareRow {
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Previous Week")]
    previous: String,
    #[tabled(rename = "Current Week")]
    current: String,
    #[tabled(rename = "Variation")]
    variation: String,
    #[tabled(rename = "Variation %")]
    variation_pct: String,
    #[tabled(rename = "Change")]
    change: String,
}

impl From<&ComparisonRow> for CompareRow {
    fn from(row: &ComparisonRow) -> Self {
        let change = match row.change_type {
            ChangeType::Increase => output::positive(row.change_type),
            ChangeType::Decrease => output::negative(row.change_type),
        };
        Self {
            store: row.kind.to_string(),
            previous: format!("{:.2}", row.previous_week_sales),
            current: format!("{:.2}", row.current_week_sales),
            variation: format!("{:.0}", row.variation_abs),
            variation_pct: format!("{:.2}", row.variation_pct),
            change,
        }
    }
}

/// Execute the compare command. Never calls the text-generation service.
pub fn execute(cli: &Cli, args: &CompareArgs) -> Result<()> {
    let config = load_config(cli)?;
    init_logging(&config, cli, None);

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.dataset.path));
    let dataset = load_dataset(&config, &input)?;

    let previous = match args.previous {
        Some(previous) => previous,
        None => dataset
            .previous_week(args.week)
            .ok_or(DomainError::NoPreviousWeek { week: args.week })?,
    };
    let table = ComparisonTable::build(
        &dataset,
        args.week,
        previous,
        config.comparison.total_placement,
    )?;
    let summary = format_summary(&table);

    if output::is_json() {
        output::json_output(json!({
            "command": "compare",
            "week": table.current_week,
            "previous_week": table.previous_week,
            "rows": table.rows(),
            "summary": summary,
        }));
        return Ok(());
    }

    output::section(&format!(
        "Week {} vs {}",
        output::highlight(table.current_week),
        table.previous_week
    ));
    let rows: Vec<CompareRow> = table.rows().iter().map(CompareRow::from).collect();
    output::table("comparison", &rows);

    output::section("Summary");
    output::lines(&summary);
    Ok(())
}
