//! Mapping rule parsing.
//!
//! A mapping rule links an input record field to a reference table column and optionally
//! selects/renames the columns copied back into the record:
//!
//! ```text
//! INPUT as LOOKUP [OUTPUT source [as target], source [as target], ...]
//! ```
//!
//! ```rust
//! use lookup_enrich::rule::MappingRule;
//!
//! let rule = MappingRule::parse("user as username OUTPUT department as dept, role").unwrap();
//! assert_eq!(rule.input_field, "user");
//! assert_eq!(rule.lookup_field, "username");
//! assert_eq!(rule.output_map.get("department").map(String::as_str), Some("dept"));
//! assert_eq!(rule.output_map.get("role").map(String::as_str), Some("role"));
//! assert!(!rule.keep_all);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LookupError, LookupResult};

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+as\s+(\S+)(?:\s+(OUTPUT)(?:\s+(.*))?)?$").expect("static rule regex")
});

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)(?:\s+as\s+(\S+))?$").expect("static item regex"));

/// Parsed mapping rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    /// Record field whose value is looked up.
    pub input_field: String,
    /// Reference table column (or DNS pseudo-column) matched against.
    pub lookup_field: String,
    /// Result key -> record field name. Empty when `keep_all` is set.
    pub output_map: BTreeMap<String, String>,
    /// `true` iff the rule had no OUTPUT clause: every result field is copied under its own name.
    pub keep_all: bool,
}

impl MappingRule {
    /// Parse a rule string.
    ///
    /// A trailing `OUTPUT` with no items is an explicit empty clause: nothing is copied. This is
    /// distinct from omitting the clause, which copies everything.
    pub fn parse(rule: &str) -> LookupResult<Self> {
        let trimmed = rule.trim();
        let caps = RULE_RE
            .captures(trimmed)
            .ok_or_else(|| invalid(rule, "expected 'INPUT as LOOKUP [OUTPUT ...]'"))?;

        let mut output_map = BTreeMap::new();
        let keep_all = caps.get(3).is_none();

        if let Some(items) = caps.get(4) {
            for item in items.as_str().split(',') {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                let parts = ITEM_RE.captures(item).ok_or_else(|| {
                    invalid(rule, format!("output item '{item}' is not 'source' or 'source as target'"))
                })?;
                let source = parts[1].to_string();
                let target = parts
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| source.clone());
                // Later items overwrite earlier ones for the same source.
                output_map.insert(source, target);
            }
        }

        Ok(Self {
            input_field: caps[1].to_string(),
            lookup_field: caps[2].to_string(),
            output_map,
            keep_all,
        })
    }

    /// Record field name a result key is written under, or `None` if the key is filtered out.
    pub fn target_for<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.keep_all {
            Some(key)
        } else {
            self.output_map.get(key).map(String::as_str)
        }
    }
}

impl FromStr for MappingRule {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical form; parsing it yields an equal rule.
impl fmt::Display for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.input_field, self.lookup_field)?;
        if self.keep_all {
            return Ok(());
        }
        f.write_str(" OUTPUT")?;
        for (i, (source, target)) in self.output_map.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            if source == target {
                f.write_str(source)?;
            } else {
                write!(f, "{source} as {target}")?;
            }
        }
        Ok(())
    }
}

fn invalid(rule: &str, message: impl Into<String>) -> LookupError {
    LookupError::InvalidRuleSyntax {
        rule: rule.to_string(),
        message: message.into(),
    }
}
