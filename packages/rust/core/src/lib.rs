//! Run orchestration and export for jobscrape.
//!
//! This crate ties extraction and normalization together into a single run
//! ([`run_batch`]) and writes the results ([`export_csv`], [`export_json`]).

pub mod export;
pub mod pipeline;

pub use export::{
    ExportOptions, QuoteStyle, export_csv, export_json, parse_csv, read_csv, to_csv_string,
    write_csv,
};
pub use jobscrape_extract::{ProgressReporter, SilentProgress};
pub use pipeline::{
    FormatStats, RunOutcome, RunSummary, format_batch, format_with_stats, run_batch,
    unique_companies,
};
