//! Shared types, error model, and configuration for jobscrape.
//!
//! This crate is the foundation depended on by all other jobscrape crates.
//! It provides:
//! - [`JobScrapeError`]: the unified error type
//! - Domain types ([`JobRecord`], [`FieldOutcome`], [`Field`], [`Batch`])
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ExportConfig, RunConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_config,
};
pub use error::{JobScrapeError, Result};
pub use types::{Batch, Field, FieldOutcome, JobRecord, JobRow};
