//! TOML configuration.
//!
//! ```toml
//! [loader]
//! root = "."
//! collection = "biographies"
//! pattern = "**/*.docx"
//! concurrency = 10
//!
//! [export]
//! path = "dist/biographies.json"
//! ```
//!
//! Every section and key is optional except where noted; [`load_config`]
//! validates the result.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoaderConfig {
    /// Project root. Relative paths below resolve against it.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Collection name; picks the default base directory.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Source directory relative to `root`. Defaults to
    /// `src/content/<collection>`.
    #[serde(default)]
    pub base: Option<PathBuf>,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Maximum files in flight during a full pass.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Keep the narrative body HTML on stored entries.
    #[serde(default = "default_true")]
    pub retain_body: bool,
    #[serde(default = "default_true")]
    pub extract_attachments: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            collection: default_collection(),
            base: None,
            pattern: default_pattern(),
            concurrency: default_concurrency(),
            retain_body: true,
            extract_attachments: true,
        }
    }
}

impl LoaderConfig {
    /// Directory the pattern is matched against.
    pub fn base_dir(&self) -> PathBuf {
        match &self.base {
            Some(base) => self.root.join(base),
            None => self
                .root
                .join("src")
                .join("content")
                .join(&self.collection),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_collection() -> String {
    "biographies".to_string()
}
fn default_pattern() -> String {
    "**/*.docx".to_string()
}
fn default_concurrency() -> usize {
    10
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExportConfig {
    /// Where `sync` and `watch` write the JSON export.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing` filter directive. `RUST_LOG` takes precedence.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.loader.concurrency == 0 {
        anyhow::bail!("loader.concurrency must be >= 1");
    }

    if config.loader.base.is_none() && config.loader.collection.trim().is_empty() {
        anyhow::bail!("loader.collection must be set when loader.base is not");
    }

    globset::Glob::new(&config.loader.pattern)
        .with_context(|| format!("Invalid loader.pattern: '{}'", config.loader.pattern))?;

    Ok(())
}
