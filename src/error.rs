use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across the crate.
pub type LookupResult<T> = Result<T, LookupError>;

/// Error type returned by rule parsing, config/table loading and stream processing.
///
/// Every variant is fatal for a run. Per-row and per-record problems (bad patterns, unparsable
/// lines, failed DNS lookups) are logged and never surface as a [`LookupError`].
#[derive(Debug, Error)]
pub enum LookupError {
    /// Underlying I/O error (e.g. file not found, broken pipe on stdout).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reference table could not be read.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Config or reference table JSON could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The mapping rule does not follow `INPUT as LOOKUP [OUTPUT item, ...]`.
    #[error("invalid mapping rule '{rule}': {message}")]
    InvalidRuleSyntax { rule: String, message: String },

    /// No configured matcher covers the rule's `(input_field, lookup_field)` pair.
    #[error("no matcher found in config for input_field='{input_field}' and lookup_field='{lookup_field}'")]
    MatcherNotFound {
        input_field: String,
        lookup_field: String,
    },

    /// The reference table extension is not one of the supported formats.
    #[error("unsupported data_source format '{extension}' ({})", .path.display())]
    UnsupportedFormat { extension: String, path: PathBuf },

    /// Config or reference table content is structurally wrong.
    #[error("config error: {message}")]
    Config { message: String },

    /// Array-mode input is not a JSON array of objects.
    #[error("failed to parse JSON array input: {0}")]
    ArrayParse(#[source] serde_json::Error),

    /// The `--dns-server` endpoint cannot be turned into a socket address.
    #[error("invalid dns server '{server}': {message}")]
    DnsServer { server: String, message: String },

    /// The resolver could not be constructed (e.g. unreadable system resolver config).
    #[error("resolver error: {message}")]
    Resolver { message: String },
}

impl LookupError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
