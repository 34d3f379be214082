//! Plain-language rendering of a comparison table.

use super::comparison::{ComparisonRow, ComparisonTable, RowKind};

/// Render one sentence per row, in table order, joined by newlines.
///
/// The output depends only on the table, so identical tables always give
/// byte-identical text.
#[must_use]
pub fn format_summary(table: &ComparisonTable) -> String {
    table
        .rows()
        .iter()
        .map(sentence)
        .collect::<Vec<_>>()
        .join("\n")
}

fn sentence(row: &ComparisonRow) -> String {
    let subject = match row.kind {
        RowKind::Total => "Total sales".to_string(),
        RowKind::Store(store) => format!("Sales in store {store}"),
    };
    format!(
        "{subject} changed by {:.0} dollars, a {} of {:.2} percent.",
        row.variation_abs, row.change_type, row.variation_pct
    )
}
