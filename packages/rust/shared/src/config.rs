//! Application configuration for jobscrape.
//!
//! User config lives at `~/.jobscrape/jobscrape.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{JobScrapeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "jobscrape.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".jobscrape";

// ---------------------------------------------------------------------------
// Config structs (matching jobscrape.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum number of postings processed per run.
    #[serde(default = "default_max_postings")]
    pub max_postings: usize,

    /// How long to wait for a posting to settle before giving up on it.
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,

    /// Path of the formatted (final) table.
    #[serde(default = "default_output")]
    pub output: String,

    /// Path of the raw, pre-normalization table.
    #[serde(default = "default_raw_output")]
    pub raw_output: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_postings: default_max_postings(),
            settle_timeout_ms: default_settle_timeout_ms(),
            output: default_output(),
            raw_output: default_raw_output(),
        }
    }
}

fn default_max_postings() -> usize {
    5
}
fn default_settle_timeout_ms() -> u64 {
    3000
}
fn default_output() -> String {
    "jobs_formatted.csv".into()
}
fn default_raw_output() -> String {
    "jobs.csv".into()
}

/// `[export]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Field delimiter for tabular output.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Also write a JSON copy of the final batch next to the table.
    #[serde(default)]
    pub write_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            write_json: false,
        }
    }
}

fn default_delimiter() -> char {
    ','
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime batch configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Maximum postings to process.
    pub limit: usize,
    /// Per-posting settle timeout.
    pub settle_timeout: Duration,
    /// Field delimiter for export.
    pub delimiter: char,
}

impl From<&AppConfig> for RunConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            limit: config.defaults.max_postings,
            settle_timeout: Duration::from_millis(config.defaults.settle_timeout_ms),
            delimiter: config.export.delimiter,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.jobscrape/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| JobScrapeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.jobscrape/jobscrape.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| JobScrapeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        JobScrapeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| JobScrapeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| JobScrapeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| JobScrapeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values the pipeline cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.defaults.max_postings == 0 {
        return Err(JobScrapeError::config("defaults.max_postings must be at least 1"));
    }

    let delimiter = config.export.delimiter;
    if matches!(delimiter, '"' | '\n' | '\r') {
        return Err(JobScrapeError::config(format!(
            "export.delimiter {delimiter:?} cannot be a quote or line break"
        )));
    }

    Ok(())
}
