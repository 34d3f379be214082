//! Highlights artifact: the sales rows augmented with one highlight per week.
//!
//! Layout: every input column (the date column normalized to ISO
//! `%Y-%m-%d`), then `Week`, `Highlights` and `Highlight_Status`. Rows whose
//! week has no highlight leave the three trailing cells empty.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{HighlightIndex, HighlightedRow, SalesDataset};
use crate::error::Result;

/// Header of the week column.
pub const WEEK_COLUMN: &str = "Week";
/// Header of the highlight text column.
pub const HIGHLIGHTS_COLUMN: &str = "Highlights";
/// Header of the generation status column.
pub const STATUS_COLUMN: &str = "Highlight_Status";

const ISO_DATE: &str = "%Y-%m-%d";

/// Write merged rows as CSV.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_artifact<W: Write>(
    writer: W,
    dataset: &SalesDataset,
    rows: &[HighlightedRow<'_>],
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let date_column = dataset.date_column();

    let mut headers: Vec<&str> = dataset.headers().iter().map(String::as_str).collect();
    headers.extend([WEEK_COLUMN, HIGHLIGHTS_COLUMN, STATUS_COLUMN]);
    csv_writer.write_record(&headers)?;

    for row in rows {
        let mut cells: Vec<String> = row.record.cells().to_vec();
        if let Some(index) = date_column {
            if let Some(cell) = cells.get_mut(index) {
                *cell = row.record.date().format(ISO_DATE).to_string();
            }
        }

        match row.highlight {
            Some(highlight) => {
                cells.push(highlight.week.format(ISO_DATE).to_string());
                cells.push(highlight.highlight_text.clone());
                cells.push(highlight.status.label().to_string());
            }
            None => cells.extend([String::new(), String::new(), String::new()]),
        }

        csv_writer.write_record(&cells)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write merged rows to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_artifact_to_path(
    path: impl AsRef<Path>,
    dataset: &SalesDataset,
    rows: &[HighlightedRow<'_>],
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_artifact(File::create(path)?, dataset, rows)?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote highlights artifact");
    Ok(())
}

/// Read the `Week → Highlights` mapping from an artifact.
///
/// Rows with an empty or unparsable week are ignored. An artifact without
/// the week or highlight columns yields an empty index.
///
/// # Errors
///
/// Returns an error if the input is not valid CSV.
pub fn read_highlights<R: Read>(reader: R) -> Result<HighlightIndex> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let week_col = headers.iter().position(|h| h.trim() == WEEK_COLUMN);
    let text_col = headers.iter().position(|h| h.trim() == HIGHLIGHTS_COLUMN);
    let (Some(week_col), Some(text_col)) = (week_col, text_col) else {
        warn!("Artifact has no Week/Highlights columns");
        return Ok(HighlightIndex::default());
    };

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let Some(week) = record
            .get(week_col)
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .and_then(|cell| NaiveDate::parse_from_str(cell, ISO_DATE).ok())
        else {
            continue;
        };
        let text = record.get(text_col).unwrap_or_default().to_string();
        entries.push((week, text));
    }

    Ok(entries.into_iter().collect())
}

/// Read the `Week → Highlights` mapping from an artifact file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid CSV.
pub fn read_highlights_from_path(path: impl AsRef<Path>) -> Result<HighlightIndex> {
    read_highlights(File::open(path.as_ref())?)
}
