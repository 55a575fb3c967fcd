//! CLI entry point for comic-shelf.
//!
//! The importer itself runs inside a host that provides the catalog; this
//! binary checks a configuration and inspects the import index.
//!
//! # Usage
//!
//! ```bash
//! shelf [OPTIONS] <COMMAND>
//!
//! # Validate the configuration and both roots
//! shelf --config shelf.json check
//!
//! # Inspect the import index
//! shelf index list
//! shelf index find 123456
//! shelf index search "sample" --format json
//! shelf index stats
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre};
use shelf_core::{Config, normalize, validate};
use shelf_index::{ImportIndex, IndexEntry};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Inspection tool for the comic folder importer.
#[derive(Parser)]
#[command(name = "shelf", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the JSON configuration file.
    ///
    /// Built-in defaults are used when not specified.
    #[arg(short, long, global = true, env = "SHELF_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Overrides the watch root from the configuration.
    #[arg(long, global = true, env = "SHELF_WATCH_ROOT")]
    watch_root: Option<Utf8PathBuf>,

    /// Overrides the archive root from the configuration.
    #[arg(long, global = true, env = "SHELF_ARCHIVE_ROOT")]
    archive_root: Option<Utf8PathBuf>,

    /// Overrides the import index path from the configuration.
    #[arg(long, global = true, env = "SHELF_INDEX")]
    index: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and the watch and archive roots.
    Check,

    /// Inspect the import index.
    Index {
        /// Index query.
        #[command(subcommand)]
        query: IndexQuery,

        /// Output format.
        #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Index queries.
#[derive(Subcommand)]
enum IndexQuery {
    /// List every entry.
    List,
    /// Find the entry with the given external identifier.
    Find {
        /// External identifier, e.g. `123456`.
        id: String,
    },
    /// Search titles and folder names (case-insensitive).
    Search {
        /// Keyword to look for.
        keyword: String,
    },
    /// Show index statistics.
    Stats,
}

/// Output format.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the configuration file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            debug!(path = %path, "Loading configuration");
            Config::from_file(path)?
        }
        None => {
            debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(root) = &cli.watch_root {
        config.watch.watch_root.clone_from(root);
    }
    if let Some(root) = &cli.archive_root {
        config.watch.archive_root.clone_from(root);
    }
    if let Some(index) = &cli.index {
        config.index.index_path.clone_from(index);
    }
    if cli.verbose {
        config.log.verbose = true;
    }

    config.validate()?;
    Ok(config)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Result of checking one configured root.
enum RootStatus {
    Ready,
    Missing,
    NotADirectory,
    Invalid(String),
}

fn check_root(path: &Utf8Path) -> RootStatus {
    if let Err(rejection) = validate(&normalize(path.as_str())) {
        return RootStatus::Invalid(rejection.reason());
    }
    if !path.exists() {
        return RootStatus::Missing;
    }
    if !path.is_dir() {
        return RootStatus::NotADirectory;
    }
    RootStatus::Ready
}

/// Reports whether the importer could run with this configuration.
///
/// # Errors
///
/// Returns an error if the watch root is unusable or the archive root is
/// invalid. A missing archive root is fine: it is created on the first scan.
fn run_check(config: &Config) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let watch = check_root(&config.watch.watch_root);
    let archive = check_root(&config.watch.archive_root);

    writeln!(handle, "Configuration")?;
    writeln!(handle, "=============")?;
    for (label, path, status) in [
        ("Watch root", &config.watch.watch_root, &watch),
        ("Archive root", &config.watch.archive_root, &archive),
    ] {
        let status = match status {
            RootStatus::Ready => "ok".to_owned(),
            RootStatus::Missing => "missing".to_owned(),
            RootStatus::NotADirectory => "not a directory".to_owned(),
            RootStatus::Invalid(reason) => format!("invalid: {reason}"),
        };
        writeln!(handle, "  {label:<14}{path} ({status})")?;
    }
    let extensions: Vec<String> = config.watch.allowed_extensions.clone().into();
    writeln!(handle, "  {:<14}{}", "Extensions", extensions.join(", "))?;
    writeln!(handle, "  {:<14}{}s", "Interval", config.schedule.interval_secs)?;
    writeln!(handle, "  {:<14}{}", "Index", config.index.index_path)?;
    writeln!(handle, "  {:<14}{}", "Library URL", config.index.web_base_url_eagle)?;

    match (&watch, &archive) {
        (RootStatus::Ready, RootStatus::Ready | RootStatus::Missing) => {
            info!("Configuration is ready");
            Ok(())
        }
        (RootStatus::Ready, _) => bail!("archive root is unusable: {}", config.watch.archive_root),
        _ => bail!("watch root is unusable: {}", config.watch.watch_root),
    }
}

/// Runs an index query.
///
/// # Errors
///
/// Returns an error if output cannot be written or a lookup finds nothing.
fn run_index(config: &Config, query: &IndexQuery, format: OutputFormat) -> color_eyre::Result<()> {
    let index = ImportIndex::new(config.index.clone());
    if !index.store().path().exists() {
        warn!(path = %index.store().path(), "Import index does not exist yet");
    }

    match query {
        IndexQuery::List => print_entries(&index.list(), format),
        IndexQuery::Find { id } => {
            let found = index
                .find_by_external_id(id)
                .ok_or_else(|| eyre!("no entry with external id {id}"))?;
            print_entries(&[found], format)
        }
        IndexQuery::Search { keyword } => print_entries(&index.search_title(keyword), format),
        IndexQuery::Stats => {
            let stats = index.stats();
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            match format {
                OutputFormat::Json => writeln!(handle, "{}", serde_json::to_string_pretty(&stats)?)?,
                OutputFormat::Text => {
                    writeln!(handle, "Entries:           {}", stats.total)?;
                    writeln!(handle, "With external id:  {}", stats.with_external_id)?;
                    writeln!(handle, "Last updated:      {}", stats.last_updated)?;
                }
            }
            Ok(())
        }
    }
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints index entries in the requested format.
fn print_entries(entries: &[(String, IndexEntry)], format: OutputFormat) -> color_eyre::Result<()> {
    #[derive(serde::Serialize)]
    struct Row<'a> {
        folder: &'a str,
        #[serde(flatten)]
        entry: &'a IndexEntry,
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if matches!(format, OutputFormat::Json) {
        let rows: Vec<Row<'_>> = entries
            .iter()
            .map(|(folder, entry)| Row { folder, entry })
            .collect();
        writeln!(handle, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(handle, "No entries.")?;
        return Ok(());
    }

    for (folder, entry) in entries {
        let title = if entry.title.is_empty() { folder } else { &entry.title };
        writeln!(handle, "{title}")?;
        writeln!(handle, "  Folder:   {folder}")?;
        writeln!(handle, "  Item:     {}", entry.item_id)?;
        if let Some(id) = &entry.external_id {
            writeln!(handle, "  ID:       {id}")?;
        }
        writeln!(handle, "  URL:      {}", entry.web_url)?;
        if !entry.tags.is_empty() {
            writeln!(handle, "  Tags:     {}", entry.tags.join(", "))?;
        }
        writeln!(handle, "  Imported: {}", entry.imported_at)?;
    }
    writeln!(handle)?;
    writeln!(handle, "{} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" })?;
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let config = build_config(&cli)?;
    match &cli.command {
        Commands::Check => run_check(&config),
        Commands::Index { query, format } => run_index(&config, query, *format),
    }
}
