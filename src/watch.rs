//! File-system events for the watch loop.
//!
//! A `notify` watcher on the base directory is translated into
//! [`WatchEvent`]s and forwarded over a tokio channel. The receiving side
//! (see [`Loader::watch`](crate::ingest::Loader::watch)) handles one event
//! at a time, in arrival order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Add(PathBuf),
    Change(PathBuf),
    Unlink(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Add(p) | WatchEvent::Change(p) | WatchEvent::Unlink(p) => p,
        }
    }
}

/// Translate one `notify` event. Metadata-only changes and access events
/// produce nothing; renames become an unlink of the old path and an add of
/// the new one.
pub fn classify(event: notify::Event) -> Vec<WatchEvent> {
    let notify::Event { kind, paths, .. } = event;
    match kind {
        EventKind::Create(_) => paths.into_iter().map(WatchEvent::Add).collect(),
        EventKind::Remove(_) => paths.into_iter().map(WatchEvent::Unlink).collect(),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::From => paths.into_iter().map(WatchEvent::Unlink).collect(),
            RenameMode::To => paths.into_iter().map(WatchEvent::Add).collect(),
            RenameMode::Both => {
                let mut it = paths.into_iter();
                it.next()
                    .map(WatchEvent::Unlink)
                    .into_iter()
                    .chain(it.map(WatchEvent::Add))
                    .collect()
            }
            _ => paths
                .into_iter()
                .map(|p| {
                    if p.exists() {
                        WatchEvent::Add(p)
                    } else {
                        WatchEvent::Unlink(p)
                    }
                })
                .collect(),
        },
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) => paths.into_iter().map(WatchEvent::Change).collect(),
        _ => Vec::new(),
    }
}

/// Keeps the underlying watcher alive; dropping it stops the events.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
}

/// Watch `base` recursively.
pub fn watch_dir(base: &Path) -> Result<(SourceWatcher, mpsc::Receiver<WatchEvent>)> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                for ev in classify(event) {
                    if tx.blocking_send(ev).is_err() {
                        return;
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "file watcher error"),
        }
    })
    .context("Failed to create file watcher")?;

    watcher
        .watch(base, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", base.display()))?;
    tracing::info!(base = %base.display(), "watching for changes");

    Ok((SourceWatcher { _watcher: watcher }, rx))
}
