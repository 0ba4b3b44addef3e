//! `lookup-enrich` enriches a stream of JSON records by matching one field of each record
//! against an external reference table (or against DNS) and copying selected columns into the
//! record, optionally under new names.
//!
//! ## Pieces
//!
//! - [`rule`]: the mapping rule `INPUT as LOOKUP [OUTPUT source [as target], ...]`
//! - [`config`]: matcher configuration (method + case sensitivity per field pair) and the
//!   reference table location
//! - [`ingestion`]: reference table loading from CSV or JSON / JSON Lines
//! - [`processing`]: the matcher engine, the DNS resolver and the enrichment step
//! - [`execution`]: the stream processor (array mode vs line mode) and observer hooks
//! - [`types`]: shared data model
//! - [`error`]: the error type used across the crate
//!
//! ## Match methods
//!
//! Reference rows are scanned in file order and the **first** matching row wins.
//!
//! - `exact`: string equality
//! - `wildcard`: the reference value is a shell pattern (`*`, `?`, `[...]`, `[^...]`, `\` escapes);
//!   `*` and `?` never match `/`
//! - `regex`: the reference value is a regular expression, matched anywhere in the input
//! - `cidr`: the reference value is a CIDR block that must contain the input address
//!
//! Unless `case_sensitive` is set, both sides are lowercased before comparing (CIDR excepted).
//!
//! ## Example
//!
//! ```no_run
//! use std::io;
//!
//! use lookup_enrich::config::Config;
//! use lookup_enrich::execution::StreamProcessor;
//! use lookup_enrich::ingestion::load_reference_table;
//! use lookup_enrich::processing::{Enricher, LookupSource};
//! use lookup_enrich::rule::MappingRule;
//!
//! # fn main() -> Result<(), lookup_enrich::LookupError> {
//! let rule = MappingRule::parse("user as username OUTPUT department as dept, role")?;
//! let config = Config::load("lookup_config.json")?;
//! let matcher = config.select_matcher(&rule)?.clone();
//! let table = load_reference_table(config.data_source_path("lookup_config.json"))?;
//!
//! let processor = StreamProcessor::new(Enricher::new(rule, LookupSource::table(table, matcher)));
//! let stats = processor.process(io::stdin().lock(), io::stdout().lock())?;
//! eprintln!("{stats}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod rule;
pub mod types;

pub use error::{LookupError, LookupResult};
