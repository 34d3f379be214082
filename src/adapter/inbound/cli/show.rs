//! Handler for the `show` command: the per-week dashboard view.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use tabled::Tabled;
use tracing::warn;

use super::command::{Cli, ShowArgs};
use super::context::{init_logging, load_config, load_dataset};
use super::output;
use crate::adapter::outbound::csv::read_highlights_from_path;
use crate::application::report::{selectable_weeks, StoreBreakdown, WeekReport};
use crate::domain::HighlightIndex;
use crate::error::Result;

#[derive(Tabled, Serialize)]
struct WeekRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Highlight")]
    highlight: String,
}

#[derive(Tabled, Serialize)]
struct StoreRow {
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Current Week")]
    current: String,
    #[tabled(rename = "Last Week")]
    previous: String,
}

impl From<&StoreBreakdown> for StoreRow {
    fn from(row: &StoreBreakdown) -> Self {
        Self {
            store: row.store.to_string(),
            current: format!("${:.2}", row.current_week_sales),
            previous: format!("${:.2}", row.previous_week_sales),
        }
    }
}

/// Execute the show command.
pub fn execute(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let config = load_config(cli)?;
    init_logging(&config, cli, None);

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.dataset.path));
    let highlights_path = args
        .highlights
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.path));

    let dataset = load_dataset(&config, &input)?;
    let highlights = if highlights_path.exists() {
        read_highlights_from_path(&highlights_path)?
    } else {
        warn!(path = %highlights_path.display(), "Highlights artifact not found");
        output::warning(&format!(
            "No highlights at {}; run `weeklight run` first",
            highlights_path.display()
        ));
        HighlightIndex::default()
    };

    match args.week {
        Some(week) => show_week(&WeekReport::build(&dataset, &highlights, week)?),
        None => list_weeks(&selectable_weeks(&dataset), &highlights),
    }
    Ok(())
}

fn list_weeks(weeks: &[chrono::NaiveDate], highlights: &HighlightIndex) {
    let rows: Vec<WeekRow> = weeks
        .iter()
        .map(|week| WeekRow {
            week: week.to_string(),
            highlight: if highlights.get(*week).is_some() {
                output::positive("yes")
            } else {
                output::muted("no")
            },
        })
        .collect();

    output::section("Available weeks");
    output::table("weeks", &rows);
    output::hint(&format!(
        "run {} for details",
        output::highlight("weeklight show --week <date>")
    ));
}

fn show_week(report: &WeekReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "show",
            "report": report,
        }));
        return;
    }

    output::section(&format!("Week {}", output::highlight(report.week)));
    output::field("This week", format!("${:.2}", report.total_current));
    output::field("Last week", format!("${:.2}", report.total_previous));
    let variation = format!("{:.2}%", report.variation_pct);
    if report.variation_pct.is_sign_negative() {
        output::field("Variation", output::negative(variation));
    } else {
        output::field("Variation", output::positive(variation));
    }

    output::section("Stores");
    let rows: Vec<StoreRow> = report.stores.iter().map(StoreRow::from).collect();
    output::table("stores", &rows);

    output::section("Highlights");
    if report.has_highlight {
        output::lines(&report.highlight);
    } else {
        output::note(&report.highlight);
    }
}
