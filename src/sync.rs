//! Per-file entry synchronization.
//!
//! [`Synchronizer::sync_file`] brings one source file's entry in the content
//! store up to date:
//!
//! 1. read the bytes and digest them
//! 2. reuse the stored entry when its digest and source path match
//! 3. otherwise parse, extract, derive the id, render and store
//!
//! The synchronizer owns the file → id map used to move or delete an
//! entry when its file changes or disappears.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use iobio_core::digest::content_digest;
use iobio_core::docx::{DocumentParser, ParseOptions};
use iobio_core::extract::{extract_biography, ExtractionOutcome, ExtractionStatus};
use iobio_core::models::{BiographyRecord, StoredEntry};
use iobio_core::slug::{entry_slug, posix_path};
use iobio_core::store::ContentStore;

use crate::render::{RenderInput, Renderer};

/// Arguments to a custom id generator.
#[derive(Debug, Clone, Copy)]
pub struct IdInput<'a> {
    /// Source path relative to the base directory.
    pub entry: &'a Path,
    pub record: &'a BiographyRecord,
}

/// Custom id generator. `record.slug`, when set, still takes precedence.
pub type GenerateId = Arc<dyn Fn(&IdInput<'_>) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub retain_body: bool,
    pub parse: ParseOptions,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            retain_body: true,
            parse: ParseOptions::default(),
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    Created,
    Updated,
    Unchanged,
    /// The file vanished before it could be read.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct FileSync {
    pub outcome: SyncOutcome,
    /// Id the file is stored under, when it was stored or reused.
    pub id: Option<String>,
    /// Extraction status when the file was (re)extracted.
    pub status: Option<ExtractionStatus>,
}

impl FileSync {
    fn skipped() -> Self {
        Self {
            outcome: SyncOutcome::Skipped,
            id: None,
            status: None,
        }
    }

    fn unchanged(id: String) -> Self {
        Self {
            outcome: SyncOutcome::Unchanged,
            id: Some(id),
            status: None,
        }
    }
}

pub struct Synchronizer {
    store: Arc<dyn ContentStore>,
    parser: Arc<dyn DocumentParser>,
    renderer: Arc<dyn Renderer>,
    generate_id: Option<GenerateId>,
    root: PathBuf,
    base: PathBuf,
    options: SyncOptions,
    file_ids: Mutex<HashMap<PathBuf, String>>,
}

impl Synchronizer {
    pub fn new(
        store: Arc<dyn ContentStore>,
        parser: Arc<dyn DocumentParser>,
        renderer: Arc<dyn Renderer>,
        root: impl Into<PathBuf>,
        base: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            parser,
            renderer,
            generate_id: None,
            root: root.into(),
            base: base.into(),
            options: SyncOptions::default(),
            file_ids: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_generate_id(mut self, generate_id: Option<GenerateId>) -> Self {
        self.generate_id = generate_id;
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Id last stored for `path`.
    pub fn previous_id(&self, path: &Path) -> Option<String> {
        self.file_ids.lock().ok()?.get(path).cloned()
    }

    fn remember(&self, path: &Path, id: &str) -> Result<()> {
        self.file_ids
            .lock()
            .map_err(|_| anyhow!("file id map lock poisoned"))?
            .insert(path.to_path_buf(), id.to_string());
        Ok(())
    }

    /// Delete the entry stored for a removed file and forget the file.
    pub async fn forget(&self, path: &Path) -> Result<Option<String>> {
        let id = self
            .file_ids
            .lock()
            .map_err(|_| anyhow!("file id map lock poisoned"))?
            .remove(path);
        if let Some(id) = &id {
            self.store.delete(id).await?;
            tracing::info!(id = %id, path = %path.display(), "removed entry");
        }
        Ok(id)
    }

    /// Source path relative to the project root, forward slashes.
    fn relative_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => posix_path(relative),
            Err(_) => path.to_string_lossy().replace('\\', "/"),
        }
    }

    /// Synchronize one file. `old_id` is the id the file was stored under
    /// before, when known.
    pub async fn sync_file(&self, path: &Path, old_id: Option<&str>) -> Result<FileSync> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "file does not exist");
            return Ok(FileSync::skipped());
        }

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let digest = content_digest(&bytes);
        let file_path = self.relative_path(path);
        let entry = path.strip_prefix(&self.base).unwrap_or(path).to_path_buf();

        for candidate in [old_id.map(str::to_string), Some(entry_slug(&entry))]
            .into_iter()
            .flatten()
        {
            if let Some(existing) = self.store.get(&candidate).await? {
                if existing.digest == digest && existing.file_path == file_path {
                    self.reuse(path, &existing).await?;
                    return Ok(FileSync::unchanged(existing.id));
                }
            }
        }

        let outcome = self.extract(path, bytes).await?;
        let ExtractionOutcome {
            status,
            record,
            body,
            ..
        } = outcome;

        let id = self.entry_id(&entry, &record);

        if let Some(old) = old_id {
            if old != id {
                self.store.delete(old).await?;
            }
        }

        let existing = self.store.get(&id).await?;
        if let Some(existing) = &existing {
            if existing.digest == digest && existing.file_path == file_path {
                self.reuse(path, existing).await?;
                return Ok(FileSync::unchanged(id));
            }
            if existing.file_path != file_path && self.root.join(&existing.file_path).exists() {
                tracing::warn!(
                    id = %id,
                    path = %path.display(),
                    previous = %existing.file_path,
                    "duplicate id; later items with the same id overwrite earlier ones"
                );
            }
        }

        let rendered = match self.renderer.render(&RenderInput {
            id: &id,
            file_path: &file_path,
            body: &body,
            record: &record,
        }) {
            Ok(rendered) => Some(rendered),
            Err(e) => {
                tracing::error!(path = %file_path, error = %e, "render failed");
                None
            }
        };

        let deferred_render = self.renderer.deferred();
        let asset_imports = rendered
            .as_ref()
            .map(|r| r.metadata.image_paths.clone())
            .unwrap_or_default();

        let stored = StoredEntry {
            id: id.clone(),
            digest,
            file_path: file_path.clone(),
            data: record,
            body: self.options.retain_body.then_some(body),
            rendered,
            deferred_render,
            asset_imports,
        };

        if deferred_render {
            self.store.add_module_import(&file_path).await?;
        }
        let replaced = self.store.set(stored).await?;
        self.remember(path, &id)?;

        let sync_outcome = if replaced || old_id.is_some() {
            SyncOutcome::Updated
        } else {
            SyncOutcome::Created
        };
        tracing::debug!(id = %id, status = status.label(), outcome = ?sync_outcome, "synced");

        Ok(FileSync {
            outcome: sync_outcome,
            id: Some(id),
            status: Some(status),
        })
    }

    async fn reuse(&self, path: &Path, existing: &StoredEntry) -> Result<()> {
        if existing.deferred_render {
            self.store.add_module_import(&existing.file_path).await?;
        }
        self.remember(path, &existing.id)
    }

    /// Parse and extract on the blocking pool. A parse failure degrades to a
    /// `Failed` outcome instead of an error.
    async fn extract(&self, path: &Path, bytes: Vec<u8>) -> Result<ExtractionOutcome> {
        let parser = Arc::clone(&self.parser);
        let options = self.options.parse;
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let shown = path.display().to_string();

        tokio::task::spawn_blocking(move || match parser.parse(&bytes, &options) {
            Ok(doc) => {
                let outcome = extract_biography(&doc, &title);
                if let ExtractionStatus::Partial { missing } = &outcome.status {
                    tracing::info!(path = %shown, missing = ?missing, "partial extraction");
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(path = %shown, error = %e, "failed to parse document");
                ExtractionOutcome::failed(&title, e)
            }
        })
        .await
        .context("extraction task panicked")
    }

    fn entry_id(&self, entry: &Path, record: &BiographyRecord) -> String {
        if let Some(slug) = &record.slug {
            return slug.clone();
        }
        match &self.generate_id {
            Some(generate) => generate(&IdInput { entry, record }),
            None => entry_slug(entry),
        }
    }
}
