//! Raw sales file reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::domain::RawTable;
use crate::error::Result;

/// Read a headered CSV into a [`RawTable`].
///
/// Rows may be ragged; width checks happen when the table is typed.
///
/// # Errors
///
/// Returns [`Error::Csv`](crate::error::Error::Csv) if the input is not
/// valid CSV.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(ToOwned::to_owned)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(ToOwned::to_owned).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Read a headered CSV file into a [`RawTable`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not valid CSV.
pub fn read_table_from_path(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let table = read_table(File::open(path)?)?;
    debug!(path = %path.display(), rows = table.rows().len(), "Read sales file");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let input = "Store,Date,Weekly_Sales,Holiday_Flag\n\
                     1,05-02-2010,1643690.9,0\n\
                     2, 05-02-2010 ,2136989.46,0\n";

        let table = read_table(input.as_bytes()).unwrap();

        assert_eq!(
            table.headers(),
            &["Store", "Date", "Weekly_Sales", "Holiday_Flag"]
        );
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1][1], "05-02-2010");
    }

    #[test]
    fn ragged_rows_are_kept() {
        let input = "Store,Date,Weekly_Sales\n1,05-02-2010\n";
        let table = read_table(input.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_table_from_path("/nonexistent/weeklight/sales.csv");
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
