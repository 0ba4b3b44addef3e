//! Core data model types.
//!
//! Reference rows are flat string maps; records are heterogeneous JSON objects.

use std::collections::BTreeMap;
use std::net::IpAddr;

/// One row of the reference table. All values are stored as strings.
pub type ReferenceRow = BTreeMap<String, String>;

/// One input record.
///
/// Values keep their JSON type; only [`serde_json::Value::String`] is eligible as matcher input.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// In-memory reference table.
///
/// Rows keep source file order, which is significant: the matcher returns the first matching row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    /// Column names. CSV header order for CSV sources, sorted key union for JSON sources.
    pub columns: Vec<String>,
    /// Rows in source order.
    pub rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<ReferenceRow>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from rows alone, deriving the column list from the keys present.
    pub fn from_rows(rows: Vec<ReferenceRow>) -> Self {
        let mut columns: Vec<String> = rows.iter().flat_map(|r| r.keys().cloned()).collect();
        columns.sort();
        columns.dedup();
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Result of a DNS lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// Reverse (PTR) lookup result, without the trailing root dot.
    Hostname(String),
    /// Forward (A/AAAA) lookup result.
    Ip(IpAddr),
}

impl ResolutionResult {
    /// Field name this result is merged under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Hostname(_) => "hostname",
            Self::Ip(_) => "ip",
        }
    }

    /// Field value as text.
    pub fn value(&self) -> String {
        match self {
            Self::Hostname(name) => name.clone(),
            Self::Ip(addr) => addr.to_string(),
        }
    }
}

/// What happened to a single input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOutcome {
    /// A lookup result was merged into the record.
    Enriched,
    /// The input field was present but nothing matched; record emitted unchanged.
    Unmatched,
    /// The input field was missing or not a string; record emitted unchanged without a lookup.
    PassedThrough,
    /// The line could not be parsed as a JSON object and was not emitted.
    Dropped,
}
