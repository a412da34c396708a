// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use linecat::config::{config_path, load_config, save_config, Config};
use linecat::{
    sort_entries, CatalogEntry, CatalogIngestor, DownloadManager, DownloadSummary, EntryStatus,
    EntryStore, ErrorBuilder, FilterEngine, IngestReport, Origin, ProgressChannel, SortKey,
    SortOrder,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

use colors::*;

/// Exit codes following sysexits.h conventions
mod exit_codes {
    /// Success - operation completed successfully
    pub const SUCCESS: i32 = 0;
    /// General error - unspecified error
    pub const ERROR: i32 = 1;
    /// Usage error - nothing selected, unknown tag
    pub const USAGE: i32 = 64;
    /// I/O error - a listing or catalog download failed
    pub const IO_ERR: i32 = 74;
}

use exit_codes::*;

/// Spinner that mirrors the progress channel
mod spinner {
    use indicatif::{ProgressBar, ProgressStyle};
    use linecat::ProgressChannel;
    use std::time::Duration;
    use tokio::task::JoinHandle;

    /// Create a spinner with consistent styling
    pub fn create(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("\u{28FB}\u{28F9}\u{28FC}\u{28F8}\u{28FE}\u{28F6}\u{28F7}\u{28E7}\u{28CF}\u{28DF} ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    /// Spinner whose message follows every change on `progress`.
    pub struct Follower {
        bar: ProgressBar,
        task: JoinHandle<()>,
    }

    impl Follower {
        /// Start following `progress`; `quiet` hides the spinner.
        pub fn start(progress: &ProgressChannel, quiet: bool) -> Self {
            let bar = if quiet {
                ProgressBar::hidden()
            } else {
                create(&progress.current())
            };
            let mut rx = progress.subscribe();
            let task_bar = bar.clone();
            let task = tokio::spawn(async move {
                while rx.changed().await.is_ok() {
                    let message = rx.borrow_and_update().clone();
                    task_bar.set_message(message);
                }
            });
            Self { bar, task }
        }

        /// Stop following and clear the spinner line.
        pub fn finish(self) {
            self.task.abort();
            self.bar.finish_and_clear();
        }
    }
}

/// linecat - browse and download CDMS/JPL line catalogs.
#[derive(Parser)]
#[command(name = "linecat")]
#[command(version = VERSION)]
#[command(about = "Browse and download molecular spectroscopy line catalogs from CDMS and JPL.")]
#[command(long_about = "linecat - CDMS and JPL line catalogs\n\n\
    List entries:        linecat list --name CO\n\
    Filter by mass:      linecat list --mass 18\n\
    Download by tag:     linecat get --tag 28503 --tag 18003\n\
    Download a view:     linecat get --mass 18 --all-visible\n\
    Configure:           linecat config show")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Download directory for this run (overrides the configured one)
    #[arg(long, global = true)]
    dest: Option<PathBuf>,

    /// Quiet mode: no spinner, errors only in the log
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Verbose mode: debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(clap::Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Keep entries whose name contains this text (case-sensitive)
    #[arg(short, long, default_value = "")]
    name: String,

    /// Keep entries with this mass number (non-numeric text is ignored)
    #[arg(short, long, default_value = "")]
    mass: String,

    /// Column to sort by
    #[arg(long, value_enum, default_value_t = SortArg::Tag)]
    sort: SortArg,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum SortArg {
    #[default]
    Tag,
    Name,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Tag => SortKey::Tag,
            SortArg::Name => SortKey::Name,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Read both archive listings and print the filtered entries
    ///
    /// Examples:
    ///   linecat list
    ///   linecat list --name CO --sort name
    ///   linecat list --mass 18 --json
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Select entries and download their catalog files
    ///
    /// Examples:
    ///   linecat get --tag 28503
    ///   linecat get --name H2O --mass 18 --all-visible
    Get {
        #[command(flatten)]
        filter: FilterArgs,
        /// Select the entry with this tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<u32>,
        /// Select every entry that passes the filters
        #[arg(long)]
        all_visible: bool,
        /// Print the completion summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set the default download directory
    SetDir { path: PathBuf },
    /// Set the CDMS base URL
    SetCdmsUrl { url: String },
    /// Set the JPL base URL
    SetJplUrl { url: String },
    /// Restore defaults
    Reset,
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Pad a string to a target display width
fn pad_display(s: &str, target_width: usize) -> String {
    let current_width = UnicodeWidthStr::width(s);
    if current_width >= target_width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(target_width - current_width))
    }
}

/// JSON shape of a listed entry.
#[derive(Serialize)]
struct EntryRow<'a> {
    tag: u32,
    name: &'a str,
    mass: u32,
    origin: Origin,
    filename: String,
    selected: bool,
}

impl<'a> From<&'a CatalogEntry> for EntryRow<'a> {
    fn from(entry: &'a CatalogEntry) -> Self {
        Self {
            tag: entry.tag(),
            name: entry.name(),
            mass: entry.mass(),
            origin: entry.origin(),
            filename: entry.filename(),
            selected: entry.is_selected(),
        }
    }
}

/// JSON document printed by `list --json`.
#[derive(Serialize)]
struct ListOutput<'a> {
    ingest: &'a IngestReport,
    entries: Vec<EntryRow<'a>>,
}

fn print_entries(entries: &[Arc<CatalogEntry>]) {
    let name_width = entries
        .iter()
        .map(|e| UnicodeWidthStr::width(e.name()))
        .max()
        .unwrap_or(0)
        .max("Name".len());

    println!(
        "{BOLD}{:>6}  {}  {:<6}  {}{RESET}",
        "Tag",
        pad_display("Name", name_width),
        "Source",
        "Get"
    );
    for entry in entries {
        let mark = if entry.is_selected() { "x" } else { "" };
        println!(
            "{:06}  {}  {:<6}  {}",
            entry.tag(),
            pad_display(entry.name(), name_width),
            entry.origin().label(),
            mark
        );
    }
}

fn report_ingest(report: &IngestReport, store: &EntryStore) {
    if let Some(error) = &report.error {
        eprintln!(
            "{YELLOW}[!]{RESET} Catalog listing incomplete ({} entries read): {}",
            store.len(),
            error
        );
    }
}

fn ingest_failure_message(report: &IngestReport, config: &Config) -> String {
    ErrorBuilder::new("Could not read any catalog listing")
        .cause(report.error.clone().unwrap_or_default())
        .cause("No network connection, or an archive is down")
        .fix(format!("Check the archive URLs ({} / {})", config.cdms_url, config.jpl_url))
        .fix("Show the settings: linecat config show")
        .build()
}

/// Read both listings into a fresh store, showing progress on the spinner.
async fn ingest_all(
    config: &Config,
    client: &reqwest::Client,
    progress: &ProgressChannel,
    quiet: bool,
) -> Result<(EntryStore, IngestReport)> {
    let store = EntryStore::new();
    let ingestor =
        CatalogIngestor::new(client.clone(), config.archives(), store.clone(), progress.clone());

    let follower = spinner::Follower::start(progress, quiet);
    let report = ingestor.spawn().await.context("Ingestion task panicked")?;
    follower.finish();

    Ok((store, report))
}

fn visible_view(store: &EntryStore, filter: &FilterArgs) -> Vec<Arc<CatalogEntry>> {
    let engine = FilterEngine::with_inputs(filter.name.clone(), filter.mass.clone());
    let mut view = engine.visible(&store.snapshot());
    let order = if filter.desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    sort_entries(&mut view, filter.sort.into(), order);
    view
}

async fn run_list(cli: &Cli, config: &Config, filter: &FilterArgs, json: bool) -> Result<i32> {
    let client = config.http_client()?;
    let progress = ProgressChannel::new();
    let (store, report) = ingest_all(config, &client, &progress, cli.quiet).await?;

    if store.is_empty() && !report.is_complete() {
        eprintln!("{}", ingest_failure_message(&report, config));
        return Ok(IO_ERR);
    }
    report_ingest(&report, &store);

    let view = visible_view(&store, filter);
    if json {
        let output = ListOutput {
            ingest: &report,
            entries: view.iter().map(|e| EntryRow::from(e.as_ref())).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_entries(&view);
        println!();
        println!("{DIM}{} of {} entries{RESET}", view.len(), store.len());
    }

    Ok(if report.is_complete() { SUCCESS } else { IO_ERR })
}

fn print_summary(summary: &DownloadSummary, destination: &std::path::Path) {
    println!();
    for outcome in &summary.outcomes {
        match &outcome.status {
            EntryStatus::Succeeded { bytes } => println!(
                "{} {:06} {} ({} bytes)",
                "[✓]".green(),
                outcome.tag,
                outcome.name,
                bytes
            ),
            EntryStatus::Failed { error } => println!(
                "{} {:06} {} - {}",
                "[✗]".red(),
                outcome.tag,
                outcome.name,
                error
            ),
        }
    }
    println!();
    println!("{}", summary.completion_message());
    println!(
        "{DIM}{} succeeded, {} failed, saved to {}{RESET}",
        summary.attempted() - summary.failure_count(),
        summary.failure_count(),
        destination.display()
    );
}

async fn run_get(
    cli: &Cli,
    config: &Config,
    filter: &FilterArgs,
    tags: &[u32],
    all_visible: bool,
    json: bool,
) -> Result<i32> {
    if tags.is_empty() && !all_visible {
        eprintln!("{RED}[✗]{RESET} Nothing to download: pass --tag or --all-visible");
        return Ok(USAGE);
    }

    let client = config.http_client()?;
    let progress = ProgressChannel::new();
    let (store, report) = ingest_all(config, &client, &progress, cli.quiet).await?;

    if store.is_empty() && !report.is_complete() {
        eprintln!("{}", ingest_failure_message(&report, config));
        return Ok(IO_ERR);
    }
    report_ingest(&report, &store);

    for &tag in tags {
        if store.set_selected(tag, true) == 0 {
            eprintln!("{YELLOW}[!]{RESET} No catalog entry with tag {:06}", tag);
        }
    }

    let view = visible_view(&store, filter);
    if all_visible {
        view.iter().for_each(|e| e.set_selected(true));
    }

    let batch_size = DownloadManager::selected_batch(&view).len();
    let hidden = store.selected_count().saturating_sub(batch_size);
    if hidden > 0 {
        eprintln!(
            "{YELLOW}[!]{RESET} {} selected entries are hidden by the filters and will be skipped",
            hidden
        );
    }
    if batch_size == 0 {
        eprintln!("{RED}[✗]{RESET} No selected entries to download");
        return Ok(USAGE);
    }

    let destination = cli
        .dest
        .clone()
        .unwrap_or_else(|| config.destination_dir());
    let manager = DownloadManager::new(client, config.archives(), progress.clone());

    let follower = spinner::Follower::start(&progress, cli.quiet);
    let summary = manager
        .spawn(&view, destination.clone())
        .await
        .context("Download task panicked")?;
    follower.finish();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &destination);
    }

    Ok(if summary.all_succeeded() { SUCCESS } else { IO_ERR })
}

fn handle_config(command: Option<ConfigCommands>) -> Result<()> {
    let mut config = load_config()?;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("{BRIGHT_CYAN}{BOLD}=== linecat Configuration ==={RESET}");
            println!();
            println!("  CDMS URL:        {}", config.cdms_url);
            println!("  JPL URL:         {}", config.jpl_url);
            let dir_display = match &config.download_dir {
                Some(dir) => dir.display().to_string(),
                None => format!(
                    "{} {DIM}(default){RESET}",
                    config.destination_dir().display()
                ),
            };
            println!("  Download dir:    {}", dir_display);
            println!("  Connect timeout: {}s", config.connect_timeout_secs);
            println!();
            if let Ok(path) = config_path() {
                println!("Config file: {}", path.display());
            }
            println!();
        }
        Some(ConfigCommands::SetDir { path }) => {
            config.download_dir = Some(path);
            save_config(&config)?;
            println!("{} Download directory saved", "[✓]".green());
        }
        Some(ConfigCommands::SetCdmsUrl { url }) => {
            config.cdms_url = url;
            save_config(&config)?;
            println!("{} CDMS URL saved", "[✓]".green());
        }
        Some(ConfigCommands::SetJplUrl { url }) => {
            config.jpl_url = url;
            save_config(&config)?;
            println!("{} JPL URL saved", "[✓]".green());
        }
        Some(ConfigCommands::Reset) => {
            save_config(&Config::default())?;
            println!("{} Configuration reset to defaults", "[✓]".green());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Commands::Config { command } = &cli.command {
        return handle_config(command.clone());
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{RED}[✗]{RESET} Failed to load configuration: {:#}", e);
            std::process::exit(ERROR);
        }
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let code = runtime.block_on(async {
        match &cli.command {
            Commands::List { filter, json } => run_list(&cli, &config, filter, *json).await,
            Commands::Get {
                filter,
                tags,
                all_visible,
                json,
            } => run_get(&cli, &config, filter, tags, *all_visible, *json).await,
            Commands::Config { .. } => Ok(SUCCESS),
        }
    })?;

    std::process::exit(code);
}
