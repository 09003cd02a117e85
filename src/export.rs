//! Export the content store as JSON for the site build.
//!
//! Produces a single document:
//!
//! ```json
//! { "exportedAt": "...", "collection": "biographies", "entries": [ ... ] }
//! ```
//!
//! Entries are sorted by id.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use iobio_core::models::StoredEntry;
use iobio_core::store::ContentStore;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportData<'a> {
    exported_at: String,
    collection: &'a str,
    entries: Vec<StoredEntry>,
}

/// Serialize every stored entry.
pub async fn export_json(store: &dyn ContentStore, collection: &str) -> Result<(String, usize)> {
    let mut entries = store.entries().await?;
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    let count = entries.len();

    let data = ExportData {
        exported_at: chrono::Utc::now().to_rfc3339(),
        collection,
        entries,
    };
    Ok((serde_json::to_string_pretty(&data)?, count))
}

/// Export the store. Writes to `output` when given, otherwise to stdout.
pub async fn run_export(
    store: &dyn ContentStore,
    collection: &str,
    output: Option<&Path>,
) -> Result<()> {
    let (json, count) = export_json(store, collection).await?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            tracing::info!(entries = count, path = %path.display(), "exported entries");
        }
        None => {
            println!("{}", json);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iobio_core::models::BiographyRecord;
    use iobio_core::store::memory::InMemoryContentStore;

    fn entry(id: &str) -> StoredEntry {
        StoredEntry {
            id: id.to_string(),
            digest: "abc".into(),
            file_path: format!("src/content/biographies/{}.docx", id),
            data: BiographyRecord {
                first_name: "Jane".into(),
                ..BiographyRecord::default()
            },
            body: Some("<p>x</p>".into()),
            rendered: None,
            deferred_render: false,
            asset_imports: Vec::new(),
        }
    }

    #[tokio::test]
    async fn export_shape() {
        let store = InMemoryContentStore::new();
        store.set(entry("b")).await.unwrap();
        store.set(entry("a")).await.unwrap();

        let (json, count) = export_json(&store, "biographies").await.unwrap();
        assert_eq!(count, 2);
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["collection"], "biographies");
        assert!(v["exportedAt"].is_string());
        assert_eq!(v["entries"][0]["id"], "a");
        assert_eq!(v["entries"][1]["id"], "b");
        assert_eq!(v["entries"][0]["data"]["firstName"], "Jane");
        assert_eq!(v["entries"][0]["filePath"], "src/content/biographies/a.docx");
    }

    #[tokio::test]
    async fn writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("dist/bios.json");
        let store = InMemoryContentStore::new();
        store.set(entry("a")).await.unwrap();

        run_export(&store, "biographies", Some(&out)).await.unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("\"entries\""));
    }
}
