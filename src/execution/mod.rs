//! Stream processing.
//!
//! [`StreamProcessor`] buffers the whole input, then picks one of two modes from the first
//! non-whitespace byte:
//!
//! - `[` selects **array mode**: the input must be one JSON array of objects. Every element is
//!   enriched and the whole array is written back pretty-printed (2-space indent) followed by a
//!   newline. A parse failure aborts the run.
//! - anything else selects **line mode**: each non-blank line is parsed as its own JSON object,
//!   enriched, and written as compact JSON plus a newline before the next line is looked at.
//!   Lines that fail to parse are logged and dropped.
//!
//! Object keys are emitted in lexicographic order in both modes.
//!
//! ```rust
//! use lookup_enrich::config::{MatchMethod, MatcherSpec};
//! use lookup_enrich::execution::StreamProcessor;
//! use lookup_enrich::processing::{Enricher, LookupSource};
//! use lookup_enrich::rule::MappingRule;
//! use lookup_enrich::types::{ReferenceRow, ReferenceTable};
//!
//! let row: ReferenceRow = [("username", "jdoe"), ("role", "Developer")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! let rule = MappingRule::parse("user as username OUTPUT role").unwrap();
//! let matcher = MatcherSpec::new("user", "username", MatchMethod::Exact, false);
//! let processor = StreamProcessor::new(Enricher::new(
//!     rule,
//!     LookupSource::table(ReferenceTable::from_rows(vec![row]), matcher),
//! ));
//!
//! let mut out = Vec::new();
//! let stats = processor
//!     .process("{\"user\":\"JDOE\"}\n{\"user\":\"alice\"}\n".as_bytes(), &mut out)
//!     .unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "{\"role\":\"Developer\",\"user\":\"JDOE\"}\n{\"user\":\"alice\"}\n"
//! );
//! assert_eq!(stats.enriched, 1);
//! ```

pub mod observer;

use std::io::{Read, Write};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{LookupError, LookupResult};
use crate::processing::Enricher;
use crate::types::{Record, RecordOutcome};

pub use observer::{EnrichmentObserver, InputMode, RecordContext, RunStats, TracingObserver};

/// Detect the input mode from the first non-whitespace byte, or `None` for blank input.
pub fn detect_mode(input: &[u8]) -> Option<InputMode> {
    input
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|&b| if b == b'[' { InputMode::Array } else { InputMode::Lines })
}

/// Drives enrichment over an input stream.
pub struct StreamProcessor {
    enricher: Enricher,
    observer: Option<Arc<dyn EnrichmentObserver>>,
}

impl std::fmt::Debug for StreamProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamProcessor")
            .field("enricher", &self.enricher)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl StreamProcessor {
    /// Create a processor without an observer.
    pub fn new(enricher: Enricher) -> Self {
        Self {
            enricher,
            observer: None,
        }
    }

    /// Report record outcomes and the run summary to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn EnrichmentObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Read all of `input`, enrich it, and write the result to `output`.
    ///
    /// Fails on read/write errors and on array-mode parse errors; everything else is
    /// recoverable and reflected in the returned [`RunStats`].
    pub fn process<R: Read, W: Write>(&self, mut input: R, mut output: W) -> LookupResult<RunStats> {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf)?;

        let mode = detect_mode(&buf);
        debug!(rule = %self.enricher.rule(), mode = ?mode, bytes = buf.len(), "processing input");

        let stats = match mode {
            None => RunStats::default(),
            Some(InputMode::Array) => self.process_array(&buf, &mut output)?,
            Some(InputMode::Lines) => self.process_lines(&buf, &mut output)?,
        };

        if let Some(obs) = self.observer.as_ref() {
            obs.on_finish(&stats);
        }
        Ok(stats)
    }

    fn process_array<W: Write>(&self, input: &[u8], output: &mut W) -> LookupResult<RunStats> {
        let records: Vec<Record> = serde_json::from_slice(input).map_err(LookupError::ArrayParse)?;

        let mut stats = RunStats::default();
        let mut enriched = Vec::with_capacity(records.len());
        for (idx0, record) in records.iter().enumerate() {
            let result = self.enricher.enrich(record);
            self.report(InputMode::Array, idx0 + 1, result.outcome, &mut stats);
            enriched.push(result.record);
        }

        serde_json::to_writer_pretty(&mut *output, &enriched)?;
        output.write_all(b"\n")?;
        output.flush()?;
        Ok(stats)
    }

    fn process_lines<W: Write>(&self, input: &[u8], output: &mut W) -> LookupResult<RunStats> {
        let mut stats = RunStats::default();

        for (idx0, line) in input.split(|&b| b == b'\n').enumerate() {
            let line_no = idx0 + 1;
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let record: Record = match serde_json::from_slice(line) {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        line = line_no,
                        error = %e,
                        content = %String::from_utf8_lossy(line),
                        "could not parse line as JSON object, skipping"
                    );
                    self.report(InputMode::Lines, line_no, RecordOutcome::Dropped, &mut stats);
                    continue;
                }
            };

            let result = self.enricher.enrich(&record);
            self.report(InputMode::Lines, line_no, result.outcome, &mut stats);

            serde_json::to_writer(&mut *output, &result.record)?;
            output.write_all(b"\n")?;
            output.flush()?;
        }

        Ok(stats)
    }

    fn report(&self, mode: InputMode, position: usize, outcome: RecordOutcome, stats: &mut RunStats) {
        stats.record(outcome);
        if let Some(obs) = self.observer.as_ref() {
            obs.on_record(&RecordContext { mode, position }, outcome);
        }
    }
}
