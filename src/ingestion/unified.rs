//! Unified reference table entrypoint.
//!
//! Most callers should use [`load_reference_table`], which picks the loader from the file
//! extension.

use std::path::Path;

use tracing::info;

use crate::error::{LookupError, LookupResult};
use crate::types::ReferenceTable;

use super::{csv, json};

/// Supported reference table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or JSON Lines.
    Json,
}

impl TableFormat {
    /// Parse a table format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "jsonl" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> LookupResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| LookupError::UnsupportedFormat {
            extension: if ext.is_empty() {
                String::new()
            } else {
                format!(".{ext}")
            },
            path: path.to_path_buf(),
        })
    }
}

/// Load a reference table, choosing CSV or JSON by file extension.
///
/// Any extension other than `.csv`, `.json`, `.jsonl` or `.ndjson` fails with
/// [`LookupError::UnsupportedFormat`].
pub fn load_reference_table(path: impl AsRef<Path>) -> LookupResult<ReferenceTable> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path)?;
    let table = match format {
        TableFormat::Csv => csv::load_csv_from_path(path)?,
        TableFormat::Json => json::load_json_from_path(path)?,
    };
    info!(
        path = %path.display(),
        format = ?format,
        rows = table.row_count(),
        "loaded reference table"
    );
    Ok(table)
}
