//! Terminal output for CLI handlers.
//!
//! Handlers never print directly. In `--json` mode every message becomes one
//! `{"type": ..., "payload": ...}` line on stdout (errors go to stderr), so a
//! `weeklight run --json | jq` pipeline sees the same envelope from every
//! command. `--quiet` drops informational lines but keeps warnings and
//! errors.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output flags from the global CLI options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// `--json`: envelope lines instead of styled text.
    pub json: bool,
    /// `--quiet`: informational lines are dropped.
    pub quiet: bool,
    /// Count of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }

    /// How an informational line is rendered. `--json` wins over `--quiet`.
    #[must_use]
    pub const fn mode(self) -> Mode {
        if self.json {
            Mode::Json
        } else if self.quiet {
            Mode::Silent
        } else {
            Mode::Text
        }
    }
}

/// Rendering chosen for informational output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Json,
    Text,
    Silent,
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn current() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Install the flags parsed by `clap`. Called once before dispatch.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

/// The JSON line written for one message.
#[must_use]
pub fn envelope(kind: &str, payload: Value) -> Value {
    json!({ "type": kind, "payload": payload })
}

/// Route an informational message: envelope in JSON mode, `text` otherwise,
/// nothing when quiet.
fn inform(kind: &str, payload: impl FnOnce() -> Value, text: impl FnOnce()) {
    match current().mode() {
        Mode::Json => println!("{}", envelope(kind, payload())),
        Mode::Text => text(),
        Mode::Silent => {}
    }
}

/// `weeklight <version>` banner shown before `run`.
pub fn header(version: &str) {
    inform(
        "header",
        || json!({ "app": "weeklight", "version": version }),
        || {
            println!("{} {}", "weeklight".bold(), version.dimmed());
            println!();
        },
    );
}

/// A `label value` pair, label padded so report fields line up.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    inform(
        "field",
        || json!({ "label": label, "value": value }),
        || println!("  {:<12} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    inform(
        "success",
        || json!({ "message": message }),
        || println!("  {} {}", "✓".green(), message),
    );
}

/// Shown even with `--quiet`.
pub fn warning(message: &str) {
    if is_json() {
        println!("{}", envelope("warning", json!({ "message": message })));
    } else {
        println!("  {} {}", "⚠".yellow(), message);
    }
}

/// Written to stderr in every mode.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", envelope("error", json!({ "message": message })));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

pub fn section(title: &str) {
    inform(
        "section",
        || json!({ "title": title }),
        || {
            println!();
            println!("{}", title.bold());
        },
    );
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Progress indicator for the highlights run. Hidden unless in text mode.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = if current().mode() == Mode::Text {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("  {spinner:.cyan} {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    } else {
        ProgressBar::hidden()
    };
    pb.set_message(message.to_string());
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    match current().mode() {
        Mode::Text => pb.finish_with_message(format!("{} {}", "✓".green(), message)),
        mode => {
            if mode == Mode::Json {
                println!("{}", envelope("spinner_success", json!({ "message": message })));
            }
            pb.finish_and_clear();
        }
    }
}

/// Failure is reported even with `--quiet`.
pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    if is_json() {
        println!("{}", envelope("spinner_fail", json!({ "message": message })));
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{} {}", "×".red(), message));
    }
}

fn styled(value: impl Display, paint: impl FnOnce(&String) -> String) -> String {
    let value = value.to_string();
    if is_json() {
        value
    } else {
        paint(&value)
    }
}

/// Sales increases and generated counts.
pub fn positive(value: impl Display) -> String {
    styled(value, |v| v.green().to_string())
}

/// Sales decreases and failed counts.
pub fn negative(value: impl Display) -> String {
    styled(value, |v| v.red().to_string())
}

pub fn highlight(value: impl Display) -> String {
    styled(value, |v| v.cyan().to_string())
}

pub fn muted(value: impl Display) -> String {
    styled(value, |v| v.dimmed().to_string())
}

pub fn note(message: &str) {
    inform(
        "note",
        || json!({ "message": message }),
        || println!("  {}", message.dimmed()),
    );
}

pub fn hint(message: &str) {
    inform(
        "hint",
        || json!({ "message": message }),
        || println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed()),
    );
}

/// Multi-line text such as a comparison summary, indented as one block.
pub fn lines(content: &str) {
    inform(
        "lines",
        || json!({ "content": content }),
        || {
            for line in content.lines() {
                println!("  {line}");
            }
        },
    );
}

/// Print a payload that is already a complete JSON document.
pub fn json_output(value: Value) {
    println!("{value}");
}

/// Rows as a rounded table, or one `table` line carrying `name` and `rows`.
pub fn table<T: Tabled + Serialize>(name: &str, rows: &[T]) {
    inform(
        "table",
        || json!({ "name": name, "rows": rows }),
        || {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            for line in table.to_string().lines() {
                println!("  {line}");
            }
        },
    );
}
