//! Storage abstraction for loaded biographies.
//!
//! The [`ContentStore`] trait is the keyed map the synchronizer writes into
//! and the site reads from. Implementations must be `Send + Sync`: a full
//! pass writes from many tasks at once.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::StoredEntry;

/// Abstract keyed store of [`StoredEntry`] values.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get`](ContentStore::get) | Entry by id |
/// | [`set`](ContentStore::set) | Insert or replace an entry |
/// | [`delete`](ContentStore::delete) | Remove an entry |
/// | [`clear`](ContentStore::clear) | Remove every entry |
/// | [`keys`](ContentStore::keys) | All ids, sorted |
/// | [`entries`](ContentStore::entries) | All entries, sorted by id |
/// | [`add_module_import`](ContentStore::add_module_import) | Register a source path for deferred rendering |
/// | [`module_imports`](ContentStore::module_imports) | Registered paths |
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<StoredEntry>>;

    /// Insert or replace the entry under `entry.id`.
    ///
    /// Returns `true` when an entry with that id already existed.
    async fn set(&self, entry: StoredEntry) -> Result<bool>;

    /// Remove an entry. Returns `true` when something was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn clear(&self) -> Result<()>;

    async fn keys(&self) -> Result<Vec<String>>;

    async fn entries(&self) -> Result<Vec<StoredEntry>>;

    /// Register a source file whose entry renders lazily.
    async fn add_module_import(&self, file_path: &str) -> Result<()>;

    async fn module_imports(&self) -> Result<Vec<String>>;
}
