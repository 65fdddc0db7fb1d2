//! End-to-end run: postings → extraction → raw batch → formatted batch.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use jobscrape_extract::{BatchCollector, PageSession, ProgressReporter, RecordAssembler, SkippedPosting};
use jobscrape_shared::{Batch, JobRecord, RunConfig};

/// Counts produced by [`format_with_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormatStats {
    /// Records dropped because normalization emptied their title or company.
    pub rejected: usize,
    pub duplicates_removed: usize,
}

/// Summary of one run, suitable for printing or writing as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub attempted: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub skipped: Vec<SkippedPosting>,
    pub duplicates_removed: usize,
    pub exported: usize,
    pub unique_companies: usize,
}

/// Result of [`run_batch`].
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Accepted records before normalization.
    pub raw: Batch,
    /// Normalized, deduplicated and truncated records, ready for export.
    pub batch: Batch,
    pub summary: RunSummary,
}

/// Normalize, re-apply the acceptance gate, deduplicate, then truncate
/// descriptions.
pub fn format_with_stats(batch: Batch) -> (Batch, FormatStats) {
    let normalized = jobscrape_normalize::normalize_batch(batch);

    let before_gate = normalized.len();
    let gated: Batch = normalized.into_iter().filter(JobRecord::is_accepted).collect();
    let rejected = before_gate - gated.len();

    let before_dedup = gated.len();
    let mut deduped = jobscrape_normalize::dedup(gated);
    let duplicates_removed = before_dedup - deduped.len();

    for record in &mut deduped {
        jobscrape_normalize::truncate_record(record);
    }

    (
        deduped,
        FormatStats {
            rejected,
            duplicates_removed,
        },
    )
}

/// [`format_with_stats`] without the counts.
pub fn format_batch(batch: Batch) -> Batch {
    format_with_stats(batch).0
}

/// Number of distinct resolved company names in `batch`.
pub fn unique_companies(batch: &[JobRecord]) -> usize {
    batch
        .iter()
        .filter_map(|r| r.company.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Collect up to `config.limit` postings from `session` and format them.
///
/// Never fails: postings that cannot be extracted are skipped and listed in
/// the summary.
#[instrument(skip_all, fields(handles = handles.len(), limit = config.limit))]
pub fn run_batch<S: PageSession>(
    session: &mut S,
    handles: &[S::Handle],
    config: &RunConfig,
    progress: &dyn ProgressReporter,
) -> RunOutcome {
    let run_id = Uuid::now_v7();
    let started_at = Utc::now();
    info!(%run_id, "starting run");

    let collector = BatchCollector::new(RecordAssembler::default(), config.settle_timeout);
    let collected = collector.collect(session, handles, config.limit, progress);

    let raw = collected.batch;
    let (batch, stats) = format_with_stats(raw.clone());

    if batch.is_empty() {
        warn!(%run_id, "no records survived the run");
    }

    let report = collected.report;
    let summary = RunSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        attempted: report.attempted,
        accepted: report.accepted - stats.rejected,
        rejected: report.rejected + stats.rejected,
        skipped: report.skipped,
        duplicates_removed: stats.duplicates_removed,
        exported: batch.len(),
        unique_companies: unique_companies(&batch),
    };

    info!(
        %run_id,
        attempted = summary.attempted,
        exported = summary.exported,
        skipped = summary.skipped.len(),
        duplicates = summary.duplicates_removed,
        "run complete"
    );

    RunOutcome { raw, batch, summary }
}
