//! CSV reference table loading.

use std::path::Path;

use crate::error::LookupResult;
use crate::types::{ReferenceRow, ReferenceTable};

/// Load a CSV reference table.
///
/// Rules:
///
/// - The first record is the header.
/// - Cells beyond the header width are discarded; short rows simply lack the trailing columns.
/// - Values are stored verbatim (no trimming, no type inference).
pub fn load_csv_from_path(path: impl AsRef<Path>) -> LookupResult<ReferenceTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Load a CSV reference table from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> LookupResult<ReferenceTable> {
    let headers = rdr.headers()?.clone();
    let columns: Vec<String> = headers.iter().map(str::to_owned).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: ReferenceRow = columns
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), value.to_owned()))
            .collect();
        rows.push(row);
    }

    Ok(ReferenceTable::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(input: &str) -> ReferenceTable {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_bytes());
        load_csv_from_reader(&mut rdr).unwrap()
    }

    #[test]
    fn header_becomes_columns_in_file_order() {
        let table = load("username,role,department\njdoe,Developer,Engineering\n");
        assert_eq!(table.columns, vec!["username", "role", "department"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0]["role"], "Developer");
    }

    #[test]
    fn ragged_rows_keep_only_header_columns() {
        let table = load("a,b\n1,2,3\n4\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0]["b"], "2");
        assert_eq!(table.rows[1].len(), 1);
        assert_eq!(table.rows[1]["a"], "4");
        assert!(!table.rows[1].contains_key("b"));
    }

    #[test]
    fn values_are_not_trimmed() {
        let table = load("a,b\n x ,\n");
        assert_eq!(table.rows[0]["a"], " x ");
        assert_eq!(table.rows[0]["b"], "");
    }
}
