//! Handler for the `run` command.

use std::path::PathBuf;

use serde_json::json;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use super::command::{Cli, RunArgs};
use super::context::{init_logging, load_config, load_dataset};
use super::output;
use crate::adapter::outbound::csv::write_artifact_to_path;
use crate::application::highlight::{merge, RunSummary};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::{llm, pipeline};

/// Execute the run command.
pub async fn execute(cli: &Cli, args: &RunArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    apply_overrides(&mut config, args);
    config.validate()?;
    init_logging(&config, cli, args.log_level.as_deref());

    let input = PathBuf::from(&config.dataset.path);
    let output_path = PathBuf::from(&config.output.path);

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Input", input.display());
    output::field("Output", output_path.display());
    output::field("Model", &config.llm.model);
    if output::verbosity() > 0 {
        output::field("Concurrency", config.generation.max_concurrency);
        output::field("Attempts", config.generation.max_attempts);
    }

    let dataset = load_dataset(&config, &input)?;
    let client = llm::build_llm_client(&config)?;
    let pipeline = pipeline::build_pipeline(&config, client)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, finishing in-flight calls");
            let _ = shutdown_tx.send(true);
        }
    });

    let spinner = output::spinner("Generating highlights");
    let run = pipeline
        .run_with_progress(&dataset, shutdown_rx, |record, done, total| {
            spinner.set_message(format!(
                "Generating highlights {done}/{total} ({} {})",
                record.week,
                record.status.label()
            ));
        })
        .await;
    let summary = run.summary();
    if run.cancelled {
        output::spinner_fail(&spinner, "Cancelled before all weeks were processed");
    } else {
        output::spinner_success(
            &spinner,
            &format!("Generated highlights for {} week(s)", summary.completed),
        );
    }

    let rows = merge(&dataset, &run.records);
    write_artifact_to_path(&output_path, &dataset, &rows)?;

    print_summary(&summary, &output_path);
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(input) = &args.input {
        config.dataset.path = input.to_string_lossy().into_owned();
    }
    if let Some(path) = &args.output {
        config.output.path = path.to_string_lossy().into_owned();
    }
    if let Some(model) = &args.model {
        config.llm.model.clone_from(model);
    }
    if let Some(max_concurrency) = args.max_concurrency {
        config.generation.max_concurrency = max_concurrency;
    }
}

fn print_summary(summary: &RunSummary, output_path: &std::path::Path) {
    if output::is_json() {
        output::json_output(json!({
            "command": "run",
            "output": output_path.display().to_string(),
            "summary": summary,
        }));
        return;
    }

    output::section("Summary");
    output::field("Weeks", format!("{}/{}", summary.completed, summary.pairs));
    output::field("Generated", output::positive(summary.generated));
    if summary.failed > 0 {
        output::field("Failed", output::negative(summary.failed));
    } else {
        output::field("Failed", summary.failed);
    }
    output::field("Skipped", summary.skipped);
    output::field(
        "Tokens",
        format!(
            "{} ({} prompt, {} completion)",
            summary.total_tokens, summary.prompt_tokens, summary.completion_tokens
        ),
    );
    output::field("Cost", format!("${:.6}", summary.cost_usd));

    if summary.cancelled {
        output::warning("Run was cancelled; remaining weeks have no highlight");
    }
    output::success(&format!("Wrote {}", output_path.display()));
}
