//! Field extraction for job postings.
//!
//! This crate provides:
//! - [`session`]: the page-session boundary and a snapshot-backed session
//! - [`strategy`]: extraction strategies, field policies, [`FieldChain`]
//! - [`FieldExtractor`]: walks a field's chain and resolves the field
//! - [`RecordAssembler`]: resolves all fields of one posting
//! - [`BatchCollector`]: processes postings with per-posting failure isolation

pub mod assembler;
pub mod collector;
pub mod extractor;
pub mod fields;
pub mod session;
pub mod strategy;

pub use assembler::RecordAssembler;
pub use collector::{
    BatchCollector, CollectReport, Collected, PostingError, ProgressReporter, SilentProgress,
    SkippedPosting, apply_acceptance_gate,
};
pub use extractor::FieldExtractor;
pub use session::{HtmlPageSession, PageSession, PageView, Snapshot, discover_snapshots};
pub use strategy::{
    ExtractionStrategy, FieldChain, FieldPolicy, FirstMatch, LabelInText, LargestMatch, LineScan,
    ScanMatches,
};
