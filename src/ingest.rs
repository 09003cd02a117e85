//! Ingestion driver.
//!
//! [`Loader::run`] clears the store and runs a full pass over the base
//! directory; [`Loader::watch`] then applies file-system events one at a
//! time. A full pass synchronizes up to `concurrency` files at once and
//! prunes entries whose source files were not seen.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use iobio_core::docx::{DocumentParser, DocxParser, ParseOptions};
use iobio_core::extract::ExtractionStatus;
use iobio_core::store::ContentStore;

use crate::config::LoaderConfig;
use crate::discover::SourceMatcher;
use crate::progress::{NoProgress, SyncProgressEvent, SyncProgressReporter};
use crate::render::{BodyRenderer, Renderer};
use crate::sync::{FileSync, GenerateId, SyncOptions, SyncOutcome, Synchronizer};
use crate::watch::WatchEvent;

/// Counts for one full pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub files: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    /// Extracted with some intro fields missing.
    pub degraded: usize,
    /// Unreadable documents plus files that errored.
    pub failed: usize,
    pub removed: usize,
    pub entries: usize,
}

impl PassSummary {
    fn record(&mut self, sync: &FileSync) {
        match sync.outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Unchanged => self.unchanged += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
        match sync.status {
            Some(ExtractionStatus::Partial { .. }) => self.degraded += 1,
            Some(ExtractionStatus::Failed { .. }) => self.failed += 1,
            _ => {}
        }
    }
}

struct Active {
    sync: Arc<Synchronizer>,
    matcher: SourceMatcher,
}

pub struct Loader {
    config: LoaderConfig,
    store: Arc<dyn ContentStore>,
    parser: Arc<dyn DocumentParser>,
    renderer: Arc<dyn Renderer>,
    generate_id: Option<GenerateId>,
    progress: Box<dyn SyncProgressReporter>,
    active: Option<Active>,
}

impl Loader {
    pub fn new(config: LoaderConfig, store: Arc<dyn ContentStore>) -> Self {
        Self {
            config,
            store,
            parser: Arc::new(DocxParser),
            renderer: Arc::new(BodyRenderer),
            generate_id: None,
            progress: Box::new(NoProgress),
            active: None,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_generate_id(mut self, generate_id: GenerateId) -> Self {
        self.generate_id = Some(generate_id);
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn SyncProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Resolved base directory, once [`run`](Self::run) found it.
    pub fn base_dir(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.matcher.base())
    }

    /// Start fresh: clear the store, then run a full pass.
    ///
    /// Returns `None` when the base directory does not exist; the loader is
    /// then inactive and ignores watch events.
    pub async fn run(&mut self) -> Result<Option<PassSummary>> {
        self.store.clear().await?;

        let base = self.config.base_dir();
        if !base.is_dir() {
            tracing::warn!(base = %base.display(), "the base directory does not exist");
            self.active = None;
            return Ok(None);
        }

        let root = std::fs::canonicalize(&self.config.root)
            .with_context(|| format!("Failed to resolve root {}", self.config.root.display()))?;
        let base = std::fs::canonicalize(&base)
            .with_context(|| format!("Failed to resolve base {}", base.display()))?;

        let matcher = SourceMatcher::new(&base, &self.config.pattern)?;
        let sync = Synchronizer::new(
            Arc::clone(&self.store),
            Arc::clone(&self.parser),
            Arc::clone(&self.renderer),
            root,
            base,
        )
        .with_generate_id(self.generate_id.clone())
        .with_options(SyncOptions {
            retain_body: self.config.retain_body,
            parse: ParseOptions {
                extract_attachments: self.config.extract_attachments,
            },
        });

        self.active = Some(Active {
            sync: Arc::new(sync),
            matcher,
        });
        self.full_pass().await.map(Some)
    }

    /// Discover and synchronize every matching file, then delete entries
    /// whose files were not seen. Does not clear the store.
    pub async fn full_pass(&self) -> Result<PassSummary> {
        let active = self
            .active
            .as_ref()
            .context("loader is not active; call run() first")?;

        self.progress.report(SyncProgressEvent::Discovering {
            collection: self.config.collection.clone(),
        });
        let files = active.matcher.discover()?;
        let mut summary = PassSummary {
            files: files.len(),
            ..PassSummary::default()
        };

        let mut untouched: HashSet<String> = self.store.keys().await?.into_iter().collect();

        if files.is_empty() {
            tracing::warn!(
                pattern = %self.config.pattern,
                base = %active.matcher.base().display(),
                "no files found matching pattern"
            );
        }

        let total = files.len() as u64;
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for path in files {
            let sync = Arc::clone(&active.sync);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        let old_id = sync.previous_id(&path);
                        sync.sync_file(&path, old_id.as_deref()).await
                    }
                    Err(e) => Err(e.into()),
                };
                (path, result)
            });
        }

        let mut done = 0u64;
        while let Some(joined) = tasks.join_next().await {
            done += 1;
            match joined {
                Ok((_, Ok(sync))) => {
                    if let Some(id) = &sync.id {
                        untouched.remove(id);
                    }
                    summary.record(&sync);
                }
                Ok((path, Err(e))) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to sync file");
                    summary.failed += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "sync task failed");
                    summary.failed += 1;
                }
            }
            self.progress.report(SyncProgressEvent::Ingesting {
                collection: self.config.collection.clone(),
                n: done,
                total,
            });
        }

        for id in untouched {
            if self.store.delete(&id).await? {
                summary.removed += 1;
            }
        }

        summary.entries = self.store.keys().await?.len();
        tracing::info!(
            files = summary.files,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            removed = summary.removed,
            "full pass complete"
        );
        Ok(summary)
    }

    /// Apply one watch event. Returns `false` when the event was ignored:
    /// the loader is inactive, or the path is outside the base directory or
    /// does not match the pattern.
    pub async fn handle_event(&self, event: WatchEvent) -> Result<bool> {
        let Some(active) = &self.active else {
            return Ok(false);
        };
        if !active.matcher.matches(event.path()) {
            return Ok(false);
        }

        match event {
            WatchEvent::Add(path) | WatchEvent::Change(path) => {
                let old_id = active.sync.previous_id(&path);
                active.sync.sync_file(&path, old_id.as_deref()).await?;
                let entry = path.strip_prefix(active.matcher.base()).unwrap_or(path.as_path());
                tracing::info!(entry = %entry.display(), "reloaded data");
            }
            WatchEvent::Unlink(path) => {
                active.sync.forget(&path).await?;
            }
        }
        Ok(true)
    }

    /// Apply events until the channel closes. Errors are logged per event.
    pub async fn watch(&self, mut events: mpsc::Receiver<WatchEvent>) -> Result<()> {
        while let Some(event) = events.recv().await {
            let path = event.path().to_path_buf();
            if let Err(e) = self.handle_event(event).await {
                tracing::warn!(path = %path.display(), error = %e, "failed to apply change");
            }
        }
        Ok(())
    }
}
