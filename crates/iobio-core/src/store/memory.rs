//! In-memory [`ContentStore`] implementation.
//!
//! Entries live in a `BTreeMap` behind `std::sync::RwLock`, so key and entry
//! listings come out in id order without sorting.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::StoredEntry;

use super::ContentStore;

/// In-memory store used by the loader and in tests.
#[derive(Default)]
pub struct InMemoryContentStore {
    entries: RwLock<BTreeMap<String, StoredEntry>>,
    module_imports: RwLock<BTreeSet<String>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| anyhow!("content store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| anyhow!("content store lock poisoned"))
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get(&self, id: &str) -> Result<Option<StoredEntry>> {
        Ok(read(&self.entries)?.get(id).cloned())
    }

    async fn set(&self, entry: StoredEntry) -> Result<bool> {
        let mut entries = write(&self.entries)?;
        Ok(entries.insert(entry.id.clone(), entry).is_some())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(write(&self.entries)?.remove(id).is_some())
    }

    async fn clear(&self) -> Result<()> {
        write(&self.entries)?.clear();
        write(&self.module_imports)?.clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(read(&self.entries)?.keys().cloned().collect())
    }

    async fn entries(&self) -> Result<Vec<StoredEntry>> {
        Ok(read(&self.entries)?.values().cloned().collect())
    }

    async fn add_module_import(&self, file_path: &str) -> Result<()> {
        write(&self.module_imports)?.insert(file_path.to_string());
        Ok(())
    }

    async fn module_imports(&self) -> Result<Vec<String>> {
        Ok(read(&self.module_imports)?.iter().cloned().collect())
    }
}
