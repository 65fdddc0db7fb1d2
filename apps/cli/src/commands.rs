//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use jobscrape_core::{ExportOptions, ProgressReporter, RunSummary};
use jobscrape_extract::{HtmlPageSession, discover_snapshots};
use jobscrape_shared::{AppConfig, RunConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// jobscrape: extract, clean and export job listings.
#[derive(Parser)]
#[command(
    name = "jobscrape",
    version,
    about = "Extract job listings from saved posting pages into a normalized CSV table.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.jobscrape/jobscrape.toml.
    #[arg(long, global = true, env = "JOBSCRAPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract postings from a directory of saved HTML pages.
    Scrape {
        /// Directory holding one `.html` snapshot per posting, processed in
        /// natural file-name order (`2.html` before `10.html`).
        snapshot_dir: PathBuf,

        /// Maximum number of postings to process.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Formatted table path.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Raw (pre-normalization) table path.
        #[arg(long)]
        raw: Option<PathBuf>,

        /// Also write the formatted batch as JSON.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the run summary as JSON.
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Clean, deduplicate and truncate a previously exported raw table.
    Format {
        /// Raw table to read.
        input: PathBuf,

        /// Formatted table path.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "jobscrape=info",
        1 => "jobscrape=debug",
        _ => "jobscrape=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Scrape {
            snapshot_dir,
            limit,
            out,
            raw,
            json,
            summary,
        } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_scrape(
                &config,
                &snapshot_dir,
                ScrapeArgs {
                    limit,
                    out,
                    raw,
                    json,
                    summary,
                },
            )
        }
        Command::Format { input, out } => {
            let config = resolve_config(config_path.as_deref())?;
            cmd_format(&config, &input, out)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// scrape
// ---------------------------------------------------------------------------

struct ScrapeArgs {
    limit: Option<usize>,
    out: Option<PathBuf>,
    raw: Option<PathBuf>,
    json: Option<PathBuf>,
    summary: Option<PathBuf>,
}

fn cmd_scrape(config: &AppConfig, snapshot_dir: &Path, args: ScrapeArgs) -> Result<()> {
    let mut run_config = RunConfig::from(config);
    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err(eyre!("--limit must be at least 1"));
        }
        run_config.limit = limit;
    }

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.defaults.output));
    let raw_out = args
        .raw
        .unwrap_or_else(|| PathBuf::from(&config.defaults.raw_output));
    let json_out = args
        .json
        .or_else(|| config.export.write_json.then(|| out.with_extension("json")));

    let snapshots = discover_snapshots(snapshot_dir)
        .wrap_err_with(|| format!("cannot list postings in {}", snapshot_dir.display()))?;

    info!(
        dir = %snapshot_dir.display(),
        postings = snapshots.len(),
        limit = run_config.limit,
        "starting scrape"
    );

    let reporter = CliProgress::new()?;
    let mut session = HtmlPageSession::new();
    let outcome = jobscrape_core::run_batch(&mut session, &snapshots, &run_config, &reporter);
    reporter.finish();

    jobscrape_core::export_csv(&outcome.raw, &raw_out, &ExportOptions::raw(run_config.delimiter))?;
    jobscrape_core::export_csv(
        &outcome.batch,
        &out,
        &ExportOptions::formatted(run_config.delimiter),
    )?;
    if let Some(path) = &json_out {
        jobscrape_core::export_json(&outcome.batch, path)?;
    }
    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&outcome.summary)?;
        std::fs::write(path, json)
            .wrap_err_with(|| format!("cannot write summary to {}", path.display()))?;
    }

    print_summary(&outcome.summary, &raw_out, &out);
    Ok(())
}

fn print_summary(summary: &RunSummary, raw_out: &Path, out: &Path) {
    let elapsed = summary.finished_at - summary.started_at;

    println!();
    println!("  Run {}", summary.run_id);
    println!("  Attempted:        {}", summary.attempted);
    println!("  Accepted:         {}", summary.accepted);
    println!("  Rejected:         {}", summary.rejected);
    println!("  Skipped:          {}", summary.skipped.len());
    println!("  Duplicates:       {}", summary.duplicates_removed);
    println!("  Exported:         {}", summary.exported);
    println!("  Unique companies: {}", summary.unique_companies);
    println!("  Raw table:        {}", raw_out.display());
    println!("  Final table:      {}", out.display());
    println!(
        "  Time:             {:.1}s",
        elapsed.num_milliseconds() as f64 / 1000.0
    );
    for skipped in &summary.skipped {
        println!("  ! {}: {}", skipped.handle, skipped.reason);
    }
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Spinner showing the posting currently being processed.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn posting_started(&self, handle: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}/{total}] {handle}"));
    }

    fn posting_finished(&self, handle: &str, ok: bool) {
        if !ok {
            self.spinner.println(format!("  skipped {handle}"));
        }
    }
}

// ---------------------------------------------------------------------------
// format
// ---------------------------------------------------------------------------

fn cmd_format(config: &AppConfig, input: &Path, out: Option<PathBuf>) -> Result<()> {
    let out = out.unwrap_or_else(|| PathBuf::from(&config.defaults.output));
    let delimiter = config.export.delimiter;

    let raw = jobscrape_core::read_csv(input, delimiter)
        .wrap_err_with(|| format!("cannot read raw table {}", input.display()))?;
    let read = raw.len();

    let (batch, stats) = jobscrape_core::format_with_stats(raw);
    jobscrape_core::export_csv(&batch, &out, &ExportOptions::formatted(delimiter))?;
    if config.export.write_json {
        jobscrape_core::export_json(&batch, &out.with_extension("json"))?;
    }

    println!();
    println!("  Read:             {read}");
    println!("  Rejected:         {}", stats.rejected);
    println!("  Duplicates:       {}", stats.duplicates_removed);
    println!("  Exported:         {}", batch.len());
    println!(
        "  Unique companies: {}",
        jobscrape_core::unique_companies(&batch)
    );
    println!("  Final table:      {}", out.display());
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
