//! Reference table matching.
//!
//! [`find_match`] scans the table in order and returns the first row whose lookup column
//! matches the input value under the configured [`MatchMethod`]. There is no index: wildcard,
//! regex and CIDR patterns live on the reference side, and the scan order decides which of
//! several matching rows wins.

use std::borrow::Cow;
use std::net::IpAddr;

use ipnet::IpNet;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::config::{MatchMethod, MatcherSpec};
use crate::processing::wildcard::wildcard_match;
use crate::types::ReferenceRow;

/// Why a single comparison could not be evaluated.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The reference value is not a valid glob pattern. Only this row is skipped.
    #[error("invalid wildcard pattern: {0}")]
    Wildcard(#[from] glob::PatternError),

    /// The reference value is not a valid regular expression. Only this row is skipped.
    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The method name is not recognized. The whole lookup yields no match.
    #[error("unknown match method '{0}'")]
    UnknownMethod(String),
}

impl MatchMethod {
    /// Compare `value` (input side) against `pattern` (reference side).
    ///
    /// Both sides are lowercased unless `case_sensitive` is set; CIDR comparisons are never
    /// folded. CIDR parse failures on either side are a plain non-match.
    pub fn matches(&self, value: &str, pattern: &str, case_sensitive: bool) -> Result<bool, MatchError> {
        let folded = || (fold(value, case_sensitive), fold(pattern, case_sensitive));

        match self {
            Self::Exact => {
                let (value, pattern) = folded();
                Ok(value == pattern)
            }
            Self::Wildcard => {
                let (value, pattern) = folded();
                Ok(wildcard_match(&pattern, &value)?)
            }
            Self::Regex => {
                let (value, pattern) = folded();
                Ok(Regex::new(&pattern)?.is_match(&value))
            }
            Self::Cidr => Ok(cidr_contains(pattern, value)),
            Self::Unknown(name) => Err(MatchError::UnknownMethod(name.clone())),
        }
    }
}

fn fold(s: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.to_lowercase())
    }
}

fn cidr_contains(block: &str, addr: &str) -> bool {
    let Ok(addr) = addr.parse::<IpAddr>() else {
        return false;
    };
    block
        .parse::<IpNet>()
        .map(|net| net.contains(&addr))
        .unwrap_or(false)
}

/// Return the first row in `table` whose `spec.lookup_field` matches `value`.
///
/// - Rows without the lookup column are skipped.
/// - A malformed wildcard/regex pattern logs a warning and scanning continues with the next row.
/// - An unknown method logs a warning and yields `None`.
pub fn find_match<'t>(value: &str, table: &'t [ReferenceRow], spec: &MatcherSpec) -> Option<&'t ReferenceRow> {
    for row in table {
        let Some(lookup_value) = row.get(&spec.lookup_field) else {
            continue;
        };

        match spec.method.matches(value, lookup_value, spec.case_sensitive) {
            Ok(true) => return Some(row),
            Ok(false) => {}
            Err(MatchError::UnknownMethod(method)) => {
                warn!(method = %method, "unknown match method; record left unmatched");
                return None;
            }
            Err(e) => {
                warn!(
                    method = %spec.method,
                    pattern = %lookup_value,
                    error = %e,
                    "error during match; skipping reference row"
                );
            }
        }
    }
    None
}
