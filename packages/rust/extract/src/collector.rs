//! Batch collection with per-posting failure isolation.
//!
//! Postings are processed strictly one at a time: the session holds a single
//! current page, so the collector borrows it mutably for the whole run.

use std::time::Duration;

use jobscrape_shared::{Batch, JobRecord, JobScrapeError};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::assembler::RecordAssembler;
use crate::session::PageSession;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Processing one posting failed; the batch carries on without it.
#[derive(Debug, thiserror::Error)]
#[error("posting {handle}: {source}")]
pub struct PostingError {
    pub handle: String,
    #[source]
    pub source: JobScrapeError,
}

/// Diagnostic for a posting that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPosting {
    pub handle: String,
    pub reason: String,
}

impl From<&PostingError> for SkippedPosting {
    fn from(err: &PostingError) -> Self {
        Self {
            handle: err.handle.clone(),
            reason: err.source.to_string(),
        }
    }
}

/// Counts for one collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectReport {
    /// Postings the collector tried to process (at most the limit).
    pub attempted: usize,
    /// Records that passed the acceptance gate.
    pub accepted: usize,
    /// Records assembled but dropped by the acceptance gate.
    pub rejected: usize,
    /// Postings whose extraction failed.
    pub skipped: Vec<SkippedPosting>,
}

/// Output of [`BatchCollector::collect`].
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub batch: Batch,
    pub report: CollectReport,
}

/// Per-posting progress callback.
pub trait ProgressReporter {
    /// Called before a posting is opened.
    fn posting_started(&self, handle: &str, current: usize, total: usize);
    /// Called once the posting was extracted or skipped.
    fn posting_finished(&self, handle: &str, ok: bool);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn posting_started(&self, _handle: &str, _current: usize, _total: usize) {}
    fn posting_finished(&self, _handle: &str, _ok: bool) {}
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Opens postings one by one and assembles a record from each.
#[derive(Debug)]
pub struct BatchCollector {
    assembler: RecordAssembler,
    settle_timeout: Duration,
}

impl BatchCollector {
    pub fn new(assembler: RecordAssembler, settle_timeout: Duration) -> Self {
        Self {
            assembler,
            settle_timeout,
        }
    }

    /// Process at most `limit` handles in order.
    ///
    /// A failing posting is logged, recorded in the report and skipped; no
    /// error escapes. Records whose title or company stayed unresolved are
    /// dropped by the acceptance gate.
    #[instrument(skip_all, fields(handles = handles.len(), limit = limit))]
    pub fn collect<S: PageSession>(
        &self,
        session: &mut S,
        handles: &[S::Handle],
        limit: usize,
        progress: &dyn ProgressReporter,
    ) -> Collected {
        let selected = &handles[..handles.len().min(limit)];
        let total = selected.len();

        let mut records = Vec::with_capacity(total);
        let mut report = CollectReport {
            attempted: total,
            ..CollectReport::default()
        };

        for (i, handle) in selected.iter().enumerate() {
            let label = handle.to_string();
            progress.posting_started(&label, i + 1, total);

            match self.process_posting(session, handle) {
                Ok(record) => {
                    debug!(posting = %label, record = %record, "posting extracted");
                    records.push(record);
                    progress.posting_finished(&label, true);
                }
                Err(err) => {
                    warn!(posting = %label, error = %err.source, "skipping posting");
                    report.skipped.push(SkippedPosting::from(&err));
                    progress.posting_finished(&label, false);
                }
            }
        }

        let (batch, rejected) = apply_acceptance_gate(records);
        report.accepted = batch.len();
        report.rejected = rejected;

        info!(
            attempted = report.attempted,
            accepted = report.accepted,
            rejected = report.rejected,
            skipped = report.skipped.len(),
            "collection complete"
        );

        Collected { batch, report }
    }

    /// Open, settle and extract one posting. The per-posting error boundary.
    fn process_posting<S: PageSession>(
        &self,
        session: &mut S,
        handle: &S::Handle,
    ) -> Result<JobRecord, PostingError> {
        let wrap = |source| PostingError {
            handle: handle.to_string(),
            source,
        };

        session.open(handle).map_err(wrap)?;

        if !session.wait_until_loaded(self.settle_timeout).map_err(wrap)? {
            return Err(wrap(JobScrapeError::Timeout {
                waited_ms: u64::try_from(self.settle_timeout.as_millis()).unwrap_or(u64::MAX),
            }));
        }

        self.assembler.assemble(&*session).map_err(wrap)
    }
}

impl Default for BatchCollector {
    fn default() -> Self {
        Self::new(RecordAssembler::default(), Duration::from_secs(3))
    }
}

/// Keep only records whose title and company are resolved.
/// Returns the kept records and how many were dropped.
pub fn apply_acceptance_gate(records: Vec<JobRecord>) -> (Batch, usize) {
    let before = records.len();
    let kept: Batch = records.into_iter().filter(JobRecord::is_accepted).collect();
    let dropped = before - kept.len();
    if dropped > 0 {
        debug!(dropped, "acceptance gate dropped unresolved records");
    }
    (kept, dropped)
}
