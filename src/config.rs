//! Lookup configuration.
//!
//! The config file is JSON:
//!
//! ```json
//! {
//!   "data_source": "users.csv",
//!   "matchers": [
//!     { "input_field": "user", "lookup_field": "username", "method": "exact", "case_sensitive": false },
//!     { "input_field": "client_ip", "lookup_field": "ip_range", "method": "cidr" }
//!   ]
//! }
//! ```
//!
//! `method` defaults to `exact` and `case_sensitive` to `false`. A relative `data_source` is
//! resolved against the config file's directory; `~/` expands to the home directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LookupError, LookupResult};
use crate::ingestion::TableFormat;
use crate::ingestion::csv::load_csv_from_path;
use crate::ingestion::json::json_keys_from_path;
use crate::rule::MappingRule;

/// How a matcher compares an input value against a reference column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchMethod {
    /// String equality.
    #[default]
    Exact,
    /// Glob pattern on the reference side.
    Wildcard,
    /// Unanchored regular expression on the reference side.
    Regex,
    /// CIDR block on the reference side, IP address on the input side.
    Cidr,
    /// Unrecognized method name. Kept so the failure is reported per record, not at load time.
    Unknown(String),
}

impl MatchMethod {
    /// Name as written in the config file.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact => "exact",
            Self::Wildcard => "wildcard",
            Self::Regex => "regex",
            Self::Cidr => "cidr",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for MatchMethod {
    fn from(name: String) -> Self {
        match name.as_str() {
            "" | "exact" => Self::Exact,
            "wildcard" => Self::Wildcard,
            "regex" => Self::Regex,
            "cidr" => Self::Cidr,
            _ => Self::Unknown(name),
        }
    }
}

impl From<MatchMethod> for String {
    fn from(method: MatchMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured matching rule for one `(input_field, lookup_field)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherSpec {
    pub input_field: String,
    pub lookup_field: String,
    #[serde(default)]
    pub method: MatchMethod,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl MatcherSpec {
    /// Create a matcher spec.
    pub fn new(
        input_field: impl Into<String>,
        lookup_field: impl Into<String>,
        method: MatchMethod,
        case_sensitive: bool,
    ) -> Self {
        Self {
            input_field: input_field.into(),
            lookup_field: lookup_field.into(),
            method,
            case_sensitive,
        }
    }
}

/// Parsed config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Reference table path as written in the file (see [`resolve_data_source_path`]).
    pub data_source: String,
    #[serde(default)]
    pub matchers: Vec<MatcherSpec>,
}

impl Config {
    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> LookupResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse config JSON.
    pub fn from_json_str(text: &str) -> LookupResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The first matcher whose field pair equals the rule's.
    pub fn select_matcher(&self, rule: &MappingRule) -> LookupResult<&MatcherSpec> {
        self.matchers
            .iter()
            .find(|m| m.input_field == rule.input_field && m.lookup_field == rule.lookup_field)
            .ok_or_else(|| LookupError::MatcherNotFound {
                input_field: rule.input_field.clone(),
                lookup_field: rule.lookup_field.clone(),
            })
    }

    /// Absolute-or-config-relative path of the reference table.
    pub fn data_source_path(&self, config_path: impl AsRef<Path>) -> PathBuf {
        resolve_data_source_path(config_path.as_ref(), &self.data_source)
    }
}

/// Resolve `data_source` as written in a config file located at `config_path`.
///
/// - `~/rest` expands to `$HOME/rest` (left as-is when `HOME` is unset)
/// - absolute paths are returned unchanged
/// - anything else is joined onto the config file's directory
pub fn resolve_data_source_path(config_path: &Path, data_source: &str) -> PathBuf {
    if let Some(rest) = data_source.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }

    let path = Path::new(data_source);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    config_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(path)
}

/// Build a config template for a data file: one case-insensitive `exact` matcher per column,
/// pairing each column with an input field of the same name.
///
/// CSV columns come from the header in file order. JSON columns are the sorted union of object
/// keys; unparsable JSON Lines are skipped.
pub fn generate_template(data_path: impl AsRef<Path>) -> LookupResult<Config> {
    let data_path = data_path.as_ref();
    let columns = match TableFormat::from_path(data_path)? {
        TableFormat::Csv => load_csv_from_path(data_path)?.columns,
        TableFormat::Json => json_keys_from_path(data_path)?,
    };
    if columns.is_empty() {
        return Err(LookupError::config(format!(
            "no keys found in data source ({})",
            data_path.display()
        )));
    }

    let matchers = columns
        .iter()
        .map(|col| MatcherSpec::new(col.clone(), col.clone(), MatchMethod::Exact, false))
        .collect();

    Ok(Config {
        data_source: data_path.display().to_string(),
        matchers,
    })
}
