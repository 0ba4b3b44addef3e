//! JSON reference table loading.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (JSON Lines): `{"a":1}\n{"a":2}\n`
//!
//! Every value is stringified: strings verbatim, numbers/booleans as their JSON text, `null` as
//! the empty string, nested arrays/objects as compact JSON.
//!
//! [`json_keys_from_str`] only collects column names (for config templates) and is lenient in
//! JSON Lines input: lines that are not JSON objects are skipped.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{LookupError, LookupResult};
use crate::types::{ReferenceRow, ReferenceTable};

/// Load a JSON reference table from a file.
pub fn load_json_from_path(path: impl AsRef<Path>) -> LookupResult<ReferenceTable> {
    let text = fs::read_to_string(path)?;
    load_json_from_str(&text)
}

/// Load a JSON reference table from an in-memory string.
pub fn load_json_from_str(input: &str) -> LookupResult<ReferenceTable> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(ReferenceTable::default());
    }

    let values = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<serde_json::Value>>(trimmed)?
    } else {
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line)
                .map_err(|e| LookupError::config(format!("invalid json line {}: {e}", i + 1)))?;
            values.push(v);
        }
        values
    };

    let mut rows = Vec::with_capacity(values.len());
    for (idx0, v) in values.into_iter().enumerate() {
        let serde_json::Value::Object(obj) = v else {
            return Err(LookupError::config(format!(
                "reference row {} is not a json object",
                idx0 + 1
            )));
        };
        let row: ReferenceRow = obj.into_iter().map(|(k, v)| (k, stringify(v))).collect();
        rows.push(row);
    }

    Ok(ReferenceTable::from_rows(rows))
}

/// Collect the sorted union of keys of a JSON file.
pub fn json_keys_from_path(path: impl AsRef<Path>) -> LookupResult<Vec<String>> {
    let text = fs::read_to_string(path)?;
    json_keys_from_str(&text)
}

/// Collect the sorted union of keys over a JSON array or JSON Lines input.
///
/// An array must parse as a whole and hold only objects. In JSON Lines, lines that fail to
/// parse as an object are ignored.
pub fn json_keys_from_str(input: &str) -> LookupResult<Vec<String>> {
    let trimmed = input.trim();
    let mut keys = BTreeSet::new();

    if trimmed.starts_with('[') {
        let objects: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(trimmed)?;
        keys.extend(objects.into_iter().flat_map(|obj| obj.into_iter().map(|(k, _)| k)));
    } else {
        for line in trimmed.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Ok(obj) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(line) {
                keys.extend(obj.into_iter().map(|(k, _)| k));
            }
        }
    }

    Ok(keys.into_iter().collect())
}

fn stringify(v: serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_objects_is_stringified() {
        let table = load_json_from_str(
            r#"[{"ip_range":"10.0.0.0/8","asn":15169,"anycast":true,"note":null,"tags":["a","b"]}]"#,
        )
        .unwrap();
        let row = &table.rows[0];
        assert_eq!(row["ip_range"], "10.0.0.0/8");
        assert_eq!(row["asn"], "15169");
        assert_eq!(row["anycast"], "true");
        assert_eq!(row["note"], "");
        assert_eq!(row["tags"], r#"["a","b"]"#);
    }

    #[test]
    fn json_lines_keep_row_order_and_union_columns() {
        let table = load_json_from_str("{\"b\":\"1\"}\n\n{\"a\":\"2\",\"b\":\"3\"}\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0]["b"], "1");
        assert_eq!(table.rows[1]["b"], "3");
        assert_eq!(table.columns, vec!["a", "b"]);
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let err = load_json_from_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("reference row 1 is not a json object"));
    }

    #[test]
    fn invalid_json_line_is_an_error() {
        let err = load_json_from_str("{\"a\":1}\nnope\n").unwrap_err();
        assert!(err.to_string().contains("invalid json line 2"));
    }

    #[test]
    fn key_scan_skips_unparsable_lines() {
        let keys = json_keys_from_str("{\"b\":1}\nnope\n[1]\n{\"a\":null,\"b\":2}\n").unwrap();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn key_scan_of_array_is_strict() {
        assert_eq!(json_keys_from_str(r#"[{"z":1},{"y":2}]"#).unwrap(), vec!["y", "z"]);
        assert!(json_keys_from_str(r#"[{"z":1}, 2]"#).is_err());
    }
}
