use std::fmt;

use tracing::{debug, info};

use crate::types::RecordOutcome;

/// How the input stream is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A single JSON array of objects.
    Array,
    /// Newline-delimited JSON objects.
    Lines,
}

/// Position of a record within the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordContext {
    pub mode: InputMode,
    /// 1-based line number in line mode, 1-based element index in array mode.
    pub position: usize,
}

/// Per-outcome record counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub enriched: u64,
    pub unmatched: u64,
    pub passed_through: u64,
    pub dropped: u64,
}

impl RunStats {
    /// Count one record.
    pub fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Enriched => self.enriched += 1,
            RecordOutcome::Unmatched => self.unmatched += 1,
            RecordOutcome::PassedThrough => self.passed_through += 1,
            RecordOutcome::Dropped => self.dropped += 1,
        }
    }

    /// Records seen, emitted or not.
    pub fn total(&self) -> u64 {
        self.enriched + self.unmatched + self.passed_through + self.dropped
    }

    /// Records written to the output.
    pub fn emitted(&self) -> u64 {
        self.total() - self.dropped
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "records={}, enriched={}, unmatched={}, passed_through={}, dropped={}",
            self.total(),
            self.enriched,
            self.unmatched,
            self.passed_through,
            self.dropped
        )
    }
}

/// Observer hook for stream processing.
///
/// Implementors can record metrics or logs. Both callbacks default to no-ops.
pub trait EnrichmentObserver: Send + Sync {
    /// Called once per input record (including dropped lines).
    fn on_record(&self, _ctx: &RecordContext, _outcome: RecordOutcome) {}

    /// Called once after the whole input has been processed.
    fn on_finish(&self, _stats: &RunStats) {}
}

/// Logs record outcomes at debug level and the run summary at info level.
///
/// Dropped lines are already reported at warn level by the stream processor, with the offending
/// content.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl EnrichmentObserver for TracingObserver {
    fn on_record(&self, ctx: &RecordContext, outcome: RecordOutcome) {
        debug!(mode = ?ctx.mode, position = ctx.position, outcome = ?outcome, "record processed");
    }

    fn on_finish(&self, stats: &RunStats) {
        info!(
            records = stats.total(),
            emitted = stats.emitted(),
            enriched = stats.enriched,
            unmatched = stats.unmatched,
            passed_through = stats.passed_through,
            dropped = stats.dropped,
            "enrichment finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_each_outcome() {
        let mut stats = RunStats::default();
        for o in [
            RecordOutcome::Enriched,
            RecordOutcome::Enriched,
            RecordOutcome::Unmatched,
            RecordOutcome::PassedThrough,
            RecordOutcome::Dropped,
        ] {
            stats.record(o);
        }
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.emitted(), 4);
        assert_eq!(
            stats.to_string(),
            "records=5, enriched=2, unmatched=1, passed_through=1, dropped=1"
        );
    }
}
