//! Normalization of extracted job records.
//!
//! Raw extracted text goes through three stages, in this order:
//! 1. [`normalize_batch`]: whitespace cleanup and duplicate-phrase collapse
//! 2. [`dedup`]: first record per (title, company) wins
//! 3. [`truncate_record`]: descriptions cut to a one-line summary

mod cleanup;
mod dedup;
mod truncate;

use jobscrape_shared::{Batch, Field, JobRecord};

pub use cleanup::{COLLAPSE_RULES, CollapseRule};
pub use dedup::dedup;
pub use truncate::{
    DESCRIPTION_DELIMITER, ELLIPSIS, MAX_SUMMARY_CHARS, truncate, truncate_record,
};

/// Clean every field of `record`.
///
/// A field that cleans down to nothing becomes unresolved. Applying this
/// twice gives the same record as applying it once.
pub fn normalize(mut record: JobRecord) -> JobRecord {
    for field in Field::ALL {
        let slot = record.field_mut(field);
        *slot = std::mem::take(slot).map_text(|text| cleanup::run_pipeline(field, text));
    }
    record
}

/// [`normalize`] every record, keeping order.
pub fn normalize_batch(batch: Batch) -> Batch {
    batch.into_iter().map(normalize).collect()
}
