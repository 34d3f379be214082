//! End-to-end flow: sales CSV in, highlights artifact out, report back.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio::sync::watch;
use weeklight::adapter::outbound::csv::{read_highlights, read_table, write_artifact};
use weeklight::application::highlight::merge;
use weeklight::application::report::{WeekReport, FALLBACK_HIGHLIGHT};
use weeklight::domain::{DatasetOptions, HighlightStatus, SalesDataset};
use weeklight::infrastructure::factory::pipeline::build_pipeline_with;
use weeklight::testkit;
use weeklight::testkit::domain::week;
use weeklight::testkit::llm::{ScriptedLlm, Step, WordCounter};

fn sales() -> SalesDataset {
    let csv = testkit::domain::sales_csv(&[
        (1, "05-02-2010", "1000"),
        (2, "05-02-2010", "500"),
        (1, "12-02-2010", "1200"),
        (2, "12-02-2010", "400"),
        (1, "19-02-2010", "1100"),
        (2, "19-02-2010", "450"),
        (7, "19-02-2010", "999"),
    ]);
    let raw = read_table(csv.as_bytes()).expect("read sales table");
    SalesDataset::load(&raw, &DatasetOptions::default()).expect("load sales")
}

fn artifact_text(dataset: &SalesDataset, llm: Arc<ScriptedLlm>) -> (String, usize) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let config = testkit::config::config();
    let pipeline = build_pipeline_with(&config, llm, Arc::new(WordCounter));
    let (_tx, rx) = watch::channel(false);
    let run = runtime.block_on(pipeline.run(dataset, rx));

    let rows = merge(dataset, &run.records);
    let mut buffer = Vec::new();
    write_artifact(&mut buffer, dataset, &rows).expect("write artifact");
    (
        String::from_utf8(buffer).expect("utf-8 artifact"),
        run.records.len(),
    )
}

#[tokio::test]
async fn every_week_pair_gets_a_highlight() {
    let dataset = sales();
    let llm = Arc::new(ScriptedLlm::replying("Sales moved."));
    let pipeline =
        build_pipeline_with(&testkit::config::config(), llm.clone(), Arc::new(WordCounter));
    let (_tx, rx) = watch::channel(false);

    let run = pipeline.run(&dataset, rx).await;

    assert!(!run.cancelled);
    assert_eq!(run.pairs_total, 2);
    let weeks: Vec<_> = run.records.iter().map(|r| r.week).collect();
    assert_eq!(weeks, vec![week(2), week(3)]);
    assert!(run
        .records
        .iter()
        .all(|r| r.status == HighlightStatus::Generated));

    let first_prompt = &llm.calls()[0].prompt;
    assert!(first_prompt
        .contains("Total sales changed by 100 dollars, a increase of 6.67 percent."));
    assert!(!first_prompt.contains("store 7"));
}

#[test]
fn artifact_keeps_input_rows_and_appends_highlights() {
    let dataset = sales();
    let (text, records) = artifact_text(&dataset, Arc::new(ScriptedLlm::replying("Sales moved.")));
    assert_eq!(records, 2);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Store,Date,Weekly_Sales,Holiday_Flag,Week,Highlights,Highlight_Status"
    );
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[1], "1,2010-02-05,1000,0,,,");
    assert_eq!(lines[3], "1,2010-02-12,1200,0,2010-02-12,Sales moved.,generated");
    assert_eq!(lines[6], "2,2010-02-19,450,0,2010-02-19,Sales moved.,generated");
}

#[test]
fn failed_week_is_recorded_and_others_survive() {
    let dataset = sales();
    let llm = Arc::new(
        ScriptedLlm::replying("Sales moved.")
            .then(Step::Fail("boom".into()))
            .then(Step::Fail("boom".into()))
            .then(Step::Fail("boom".into())),
    );
    let (text, _) = artifact_text(&dataset, llm);

    let index = read_highlights(text.as_bytes()).expect("read artifact");
    assert_eq!(index.get(week(2)), None);
    assert_eq!(index.get(week(3)), Some("Sales moved."));
    assert!(text.contains(",failed"));
}

#[test]
fn report_reads_highlights_back_from_artifact() {
    let dataset = sales();
    let (text, _) = artifact_text(&dataset, Arc::new(ScriptedLlm::replying("Sales moved.")));
    let index = read_highlights(text.as_bytes()).expect("read artifact");

    let report = WeekReport::build(&dataset, &index, week(3)).expect("report");
    assert_eq!(report.previous_week, week(2));
    assert_eq!(report.total_current, dec!(1550));
    assert_eq!(report.total_previous, dec!(1600));
    assert_eq!(report.highlight, "Sales moved.");

    let first = WeekReport::build(&dataset, &index, week(1)).expect("report");
    assert_eq!(first.highlight, FALLBACK_HIGHLIGHT);
    assert!(!first.has_highlight);
}
