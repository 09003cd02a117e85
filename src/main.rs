//! # IO BIO CLI (`iobio`)
//!
//! ## Usage
//!
//! ```bash
//! iobio --config ./config/iobio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `iobio sync` | Full pass over the base directory, then export |
//! | `iobio watch` | Full pass, then re-sync on every file change |
//! | `iobio extract <file>` | Print one document's extraction as JSON |
//! | `iobio status` | Show the resolved base directory and matching files |

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use iobio::config::{self, Config};
use iobio::discover::SourceMatcher;
use iobio::export;
use iobio::ingest::{Loader, PassSummary};
use iobio::progress::ProgressMode;
use iobio::watch;
use iobio_core::docx::{DocumentParser, DocxParser, ParseOptions};
use iobio_core::extract::{extract_biography, ExtractionOutcome};
use iobio_core::store::memory::InMemoryContentStore;
use iobio_core::store::ContentStore;

/// IO BIO content loader.
///
/// Turns a directory of DOCX biographies into structured entries with
/// rendered HTML. See `config/iobio.example.toml` for configuration.
#[derive(Parser)]
#[command(
    name = "iobio",
    about = "IO BIO content loader: DOCX biographies to structured entries",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/iobio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every matching document and print a summary.
    Sync {
        /// Write the JSON export here (overrides `[export].path`).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Progress on stderr. Defaults to `human` on a TTY, else `off`.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Load, then keep the store in step with file changes until Ctrl-C.
    ///
    /// The export is rewritten after every applied change.
    Watch {
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Parse one DOCX file and print the extraction outcome as JSON.
    ///
    /// Does not read the configuration file.
    Extract {
        /// Path to the `.docx` file.
        file: PathBuf,
    },

    /// Show the base directory, pattern, and matching file count.
    Status,
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.is_empty() => EnvFilter::new(directive),
        _ => EnvFilter::try_new(default_filter).context("Invalid [log].filter")?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Extract { file } = &cli.command {
        init_tracing("warn")?;
        return run_extract(file);
    }

    let cfg = config::load_config(&cli.config)?;
    init_tracing(&cfg.log.filter)?;

    match cli.command {
        Commands::Sync { output, progress } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            run_sync(&cfg, output.as_deref(), mode).await?;
        }
        Commands::Watch { output } => {
            run_watch(&cfg, output.as_deref()).await?;
        }
        Commands::Status => {
            run_status(&cfg)?;
        }
        Commands::Extract { .. } => unreachable!("handled before config loading"),
    }

    Ok(())
}

fn export_path<'a>(cfg: &'a Config, output: Option<&'a Path>) -> Option<&'a Path> {
    output.or(cfg.export.path.as_deref())
}

async fn run_sync(cfg: &Config, output: Option<&Path>, mode: ProgressMode) -> Result<()> {
    let store: Arc<dyn ContentStore> = Arc::new(InMemoryContentStore::new());
    let mut loader = Loader::new(cfg.loader.clone(), Arc::clone(&store)).with_progress(mode.reporter());

    let Some(summary) = loader.run().await? else {
        println!("sync {}", cfg.loader.collection);
        println!("  base directory not found: {}", cfg.loader.base_dir().display());
        return Ok(());
    };
    print_summary(&cfg.loader.collection, &summary);

    if let Some(path) = export_path(cfg, output) {
        export::run_export(store.as_ref(), &cfg.loader.collection, Some(path)).await?;
    }
    Ok(())
}

fn print_summary(collection: &str, s: &PassSummary) {
    println!("sync {}", collection);
    println!("  files: {}", s.files);
    println!("  created: {}", s.created);
    println!("  updated: {}", s.updated);
    println!("  unchanged: {}", s.unchanged);
    println!("  degraded: {}", s.degraded);
    println!("  failed: {}", s.failed);
    println!("  removed: {}", s.removed);
    println!("  entries: {}", s.entries);
    println!("ok");
}

async fn run_watch(cfg: &Config, output: Option<&Path>) -> Result<()> {
    let store: Arc<dyn ContentStore> = Arc::new(InMemoryContentStore::new());
    let mut loader = Loader::new(cfg.loader.clone(), Arc::clone(&store));
    let collection = cfg.loader.collection.as_str();
    let output = export_path(cfg, output);

    let Some(summary) = loader.run().await? else {
        return Ok(());
    };
    print_summary(collection, &summary);
    if let Some(path) = output {
        export::run_export(store.as_ref(), collection, Some(path)).await?;
    }

    let base = loader
        .base_dir()
        .context("base directory unresolved after load")?
        .to_path_buf();
    let (_watcher, mut events) = watch::watch_dir(&base)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopping watch");
                break;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                let path = event.path().to_path_buf();
                match loader.handle_event(event).await {
                    Ok(true) => {
                        if let Some(out) = output {
                            export::run_export(store.as_ref(), collection, Some(out)).await?;
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to apply change");
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_extract(file: &Path) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let title = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let outcome = match DocxParser.parse(&bytes, &ParseOptions::default()) {
        Ok(doc) => extract_biography(&doc, &title),
        Err(e) => ExtractionOutcome::failed(&title, e),
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn run_status(cfg: &Config) -> Result<()> {
    let base = cfg.loader.base_dir();
    println!("collection: {}", cfg.loader.collection);
    println!("base: {}", base.display());
    println!("pattern: {}", cfg.loader.pattern);
    if !base.is_dir() {
        println!("files: 0 (base directory not found)");
        return Ok(());
    }
    let matcher = SourceMatcher::new(&base, &cfg.loader.pattern)?;
    println!("files: {}", matcher.discover()?.len());
    Ok(())
}
