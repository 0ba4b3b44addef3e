//! Lookup and enrichment.
//!
//! - [`matcher`]: ordered first-match scan of a reference table (exact/wildcard/regex/CIDR)
//! - [`dns`]: forward/reverse DNS resolution
//! - [`enrich`]: merging a lookup result into a record under a [`crate::rule::MappingRule`]
//!
//! ## Example: enrich one record from an in-memory table
//!
//! ```rust
//! use lookup_enrich::config::{MatchMethod, MatcherSpec};
//! use lookup_enrich::processing::{Enricher, LookupSource};
//! use lookup_enrich::rule::MappingRule;
//! use lookup_enrich::types::{RecordOutcome, ReferenceRow, ReferenceTable};
//!
//! let row: ReferenceRow = [("ip_range", "10.0.0.0/8"), ("site", "datacenter")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! let table = ReferenceTable::from_rows(vec![row]);
//!
//! let rule = MappingRule::parse("client_ip as ip_range OUTPUT site as location").unwrap();
//! let matcher = MatcherSpec::new("client_ip", "ip_range", MatchMethod::Cidr, false);
//! let enricher = Enricher::new(rule, LookupSource::table(table, matcher));
//!
//! let record = serde_json::json!({"client_ip": "10.1.2.3"});
//! let out = enricher.enrich(record.as_object().unwrap());
//! assert_eq!(out.outcome, RecordOutcome::Enriched);
//! assert_eq!(out.record["location"], "datacenter");
//! ```

pub mod dns;
pub mod enrich;
pub mod matcher;
mod wildcard;

pub use dns::{DnsResolver, HickoryNameService, NameService};
pub use enrich::{Enricher, Enrichment, LookupHit, LookupSource};
pub use matcher::{find_match, MatchError};
