//! Merging lookup results into records.

use serde_json::Value as JsonValue;

use crate::config::MatcherSpec;
use crate::rule::MappingRule;
use crate::types::{Record, RecordOutcome, ReferenceRow, ReferenceTable, ResolutionResult};

use super::dns::DnsResolver;
use super::matcher::find_match;

/// Where lookups are answered from.
#[derive(Debug)]
pub enum LookupSource {
    /// Reference table scanned with the selected matcher.
    Table {
        table: ReferenceTable,
        matcher: MatcherSpec,
    },
    /// DNS, forward or reverse depending on the value.
    Dns(DnsResolver),
}

impl LookupSource {
    /// Table source.
    pub fn table(table: ReferenceTable, matcher: MatcherSpec) -> Self {
        Self::Table { table, matcher }
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupHit<'a> {
    /// First matching reference row.
    Row(&'a ReferenceRow),
    /// DNS answer.
    Resolved(ResolutionResult),
}

/// Output of [`Enricher::enrich`].
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    /// The record to emit.
    pub record: Record,
    /// What happened to it.
    pub outcome: RecordOutcome,
}

/// Applies a [`MappingRule`] against a [`LookupSource`].
#[derive(Debug)]
pub struct Enricher {
    rule: MappingRule,
    source: LookupSource,
}

impl Enricher {
    /// Create an enricher.
    pub fn new(rule: MappingRule, source: LookupSource) -> Self {
        Self { rule, source }
    }

    /// The mapping rule in use.
    pub fn rule(&self) -> &MappingRule {
        &self.rule
    }

    /// Look a single value up in the configured source.
    pub fn lookup(&self, value: &str) -> Option<LookupHit<'_>> {
        match &self.source {
            LookupSource::Table { table, matcher } => find_match(value, &table.rows, matcher).map(LookupHit::Row),
            LookupSource::Dns(resolver) => resolver.resolve(value).map(LookupHit::Resolved),
        }
    }

    /// Enrich one record.
    ///
    /// The input is never modified: the output starts as a copy of every original field, and
    /// result fields are written over it. A missing or non-string input field skips the lookup.
    pub fn enrich(&self, record: &Record) -> Enrichment {
        let Some(JsonValue::String(value)) = record.get(&self.rule.input_field) else {
            return Enrichment {
                record: record.clone(),
                outcome: RecordOutcome::PassedThrough,
            };
        };

        let Some(hit) = self.lookup(value) else {
            return Enrichment {
                record: record.clone(),
                outcome: RecordOutcome::Unmatched,
            };
        };

        let mut out = record.clone();
        match hit {
            LookupHit::Row(row) => {
                for (key, value) in row {
                    self.apply(&mut out, key, value);
                }
            }
            LookupHit::Resolved(res) => self.apply(&mut out, res.key(), &res.value()),
        }

        Enrichment {
            record: out,
            outcome: RecordOutcome::Enriched,
        }
    }

    fn apply(&self, out: &mut Record, key: &str, value: &str) {
        if let Some(target) = self.rule.target_for(key) {
            out.insert(target.to_string(), JsonValue::String(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMethod;
    use serde_json::json;

    fn record(v: JsonValue) -> Record {
        match v {
            JsonValue::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn users_table() -> ReferenceTable {
        let row: ReferenceRow = [("username", "jdoe"), ("role", "Manager"), ("dept", "Sales")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReferenceTable::from_rows(vec![row])
    }

    fn enricher(rule: &str) -> Enricher {
        let rule = MappingRule::parse(rule).unwrap();
        let matcher = MatcherSpec::new(rule.input_field.clone(), rule.lookup_field.clone(), MatchMethod::Exact, false);
        Enricher::new(rule, LookupSource::table(users_table(), matcher))
    }

    #[test]
    fn output_clause_filters_and_renames() {
        let e = enricher("user as username OUTPUT role as r");
        let out = e.enrich(&record(json!({"user": "JDOE"})));
        assert_eq!(out.outcome, RecordOutcome::Enriched);
        assert_eq!(JsonValue::Object(out.record), json!({"user": "JDOE", "r": "Manager"}));
    }

    #[test]
    fn omitted_output_clause_copies_every_column() {
        let e = enricher("user as username");
        let out = e.enrich(&record(json!({"user": "jdoe"})));
        assert_eq!(
            JsonValue::Object(out.record),
            json!({"user": "jdoe", "username": "jdoe", "role": "Manager", "dept": "Sales"})
        );
    }

    #[test]
    fn explicit_empty_output_clause_adds_nothing() {
        let e = enricher("user as username OUTPUT");
        let input = record(json!({"user": "jdoe"}));
        let out = e.enrich(&input);
        assert_eq!(out.outcome, RecordOutcome::Enriched);
        assert_eq!(out.record, input);
    }

    #[test]
    fn result_fields_overwrite_existing_record_fields() {
        let e = enricher("user as username OUTPUT role");
        let out = e.enrich(&record(json!({"user": "jdoe", "role": 7})));
        assert_eq!(out.record["role"], json!("Manager"));
    }

    #[test]
    fn non_string_or_missing_input_passes_through() {
        let e = enricher("x as username");
        for input in [json!({"x": 5}), json!({"x": null}), json!({"x": ["jdoe"]}), json!({"y": "jdoe"})] {
            let input = record(input);
            let out = e.enrich(&input);
            assert_eq!(out.outcome, RecordOutcome::PassedThrough);
            assert_eq!(out.record, input);
        }
    }

    #[test]
    fn unmatched_record_is_unchanged() {
        let e = enricher("user as username");
        let input = record(json!({"user": "alice", "n": 1.5, "nested": {"a": [1, 2]}}));
        let out = e.enrich(&input);
        assert_eq!(out.outcome, RecordOutcome::Unmatched);
        assert_eq!(out.record, input);
    }
}
