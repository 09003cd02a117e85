//! Integration tests for the loader: full pass, change detection, pruning,
//! and watch events, over DOCX fixtures built in memory.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use iobio::config::LoaderConfig;
use iobio::ingest::Loader;
use iobio::render::{RenderError, RenderInput, Renderer, EMPTY_BODY_PLACEHOLDER};
use iobio::sync::{GenerateId, IdInput};
use iobio::watch::WatchEvent;
use iobio_core::document::SourceDocument;
use iobio_core::docx::{DocumentParser, DocxParser, ParseError, ParseOptions};
use iobio_core::models::RenderedContent;
use iobio_core::store::memory::InMemoryContentStore;
use iobio_core::store::ContentStore;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn paragraph(bold: &str, plain: &str) -> String {
    let mut runs = String::new();
    if !bold.is_empty() {
        runs.push_str(&format!(
            "<w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r>",
            bold
        ));
    }
    if !plain.is_empty() {
        runs.push_str(&format!(
            "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>",
            plain
        ));
    }
    format!("<w:p>{}</w:p>", runs)
}

fn docx(paragraphs: &[String]) -> Vec<u8> {
    use std::io::Write;
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        let xml = format!(
            "<?xml version=\"1.0\"?><w:document xmlns:w=\"{}\"><w:body>{}</w:body></w:document>",
            W_NS,
            paragraphs.concat()
        );
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf
}

fn biography(last: &str, first: &str, life_tail: &str) -> Vec<u8> {
    docx(&[
        paragraph(
            "",
            &format!(
                "{}, {}, Norwegian Secretary-General of the United Nations (UN) 1946-1952, was born in Oslo{}",
                last, first, life_tail
            ),
        ),
        paragraph("", "Source: UN Photo"),
        paragraph("", "He negotiated the first armistice."),
        paragraph("ARCHIVES", ""),
        paragraph("", "UN Archives, New York."),
        paragraph("", "Version 1, 2024"),
    ])
}

fn unstructured() -> Vec<u8> {
    docx(&[paragraph("", "Notes without any structure.")])
}

struct Site {
    _tmp: TempDir,
    root: PathBuf,
    base: PathBuf,
}

impl Site {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        let base = root.join("src/content/biographies");
        fs::create_dir_all(&base).unwrap();
        Self {
            _tmp: tmp,
            root,
            base,
        }
    }

    fn write(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.base.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    fn config(&self) -> LoaderConfig {
        LoaderConfig {
            root: self.root.clone(),
            ..LoaderConfig::default()
        }
    }
}

fn memory_store() -> Arc<dyn ContentStore> {
    Arc::new(InMemoryContentStore::new())
}

/// Resolved path of `relative` under the loader's base directory.
fn resolved(loader: &Loader, relative: &str) -> PathBuf {
    loader.base_dir().unwrap().join(relative)
}

/// Wraps the DOCX parser, counting calls and tracking peak concurrency.
#[derive(Default)]
struct CountingParser {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    delay_ms: u64,
}

impl DocumentParser for CountingParser {
    fn parse(&self, bytes: &[u8], options: &ParseOptions) -> Result<SourceDocument, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if self.delay_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(self.delay_ms));
        }
        let result = DocxParser.parse(bytes, options);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[tokio::test]
async fn full_pass_loads_every_document() {
    let site = Site::new();
    site.write("lie-trygve.docx", &biography("LIE", "Trygve", "."));
    site.write("drafts/notes.docx", &unstructured());
    site.write("readme.txt", b"not a biography");

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    let summary = loader.run().await.unwrap().unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.created, 2);
    assert_eq!(summary.degraded, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.entries, 2);
    assert_eq!(store.keys().await.unwrap(), vec!["drafts/notes", "lie-trygve"]);

    let entry = store.get("lie-trygve").await.unwrap().unwrap();
    assert_eq!(entry.file_path, "src/content/biographies/lie-trygve.docx");
    assert_eq!(entry.digest.len(), 64);
    assert_eq!(entry.data.title, "lie-trygve");
    assert_eq!(entry.data.last_name, "Lie");
    assert_eq!(entry.data.first_name, "Trygve");
    assert_eq!(entry.data.organisation, "UN");
    assert_eq!(entry.data.nationality, "Norwegian");
    assert_eq!(entry.data.country, "Norway");
    assert_eq!(entry.data.start_year, "1946");
    assert_eq!(entry.data.end_year, "1952");
    assert_eq!(entry.data.image_source, "UN Photo");
    assert_eq!(entry.data.version, "Version 1, 2024");
    assert_eq!(entry.data.archives, "<p></p><p>UN Archives, New York.</p>");
    assert_eq!(
        entry.body.as_deref(),
        Some("<p>He negotiated the first armistice.</p>")
    );
    assert_eq!(
        entry.rendered.unwrap().html,
        "<p>He negotiated the first armistice.</p>"
    );

    let notes = store.get("drafts/notes").await.unwrap().unwrap();
    assert_eq!(notes.data.first_name, "");
    assert_eq!(notes.data.summary, "");
    assert_eq!(notes.rendered.unwrap().html, EMPTY_BODY_PLACEHOLDER);
}

#[tokio::test]
async fn unchanged_files_are_not_parsed_again() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));
    site.write("b.docx", &biography("BETA", "Bo", "."));

    let parser = Arc::new(CountingParser::default());
    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store)).with_parser(parser.clone());

    loader.run().await.unwrap();
    assert_eq!(parser.calls.load(Ordering::SeqCst), 2);
    let before = store.get("a").await.unwrap().unwrap();

    let summary = loader.full_pass().await.unwrap();
    assert_eq!(summary.unchanged, 2);
    assert_eq!(summary.created + summary.updated, 0);
    assert_eq!(parser.calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.get("a").await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn full_pass_prunes_entries_without_files() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));
    let b = site.write("b.docx", &biography("BETA", "Bo", "."));

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();
    assert_eq!(store.keys().await.unwrap().len(), 2);

    fs::remove_file(b).unwrap();
    let summary = loader.full_pass().await.unwrap();
    assert_eq!(summary.removed, 1);
    assert_eq!(store.keys().await.unwrap(), vec!["a"]);
}

#[tokio::test]
async fn full_pass_prunes_when_the_last_file_is_gone() {
    let site = Site::new();
    let a = site.write("a.docx", &biography("ALPHA", "Ann", "."));

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();
    assert_eq!(store.keys().await.unwrap(), vec!["a"]);

    fs::remove_file(a).unwrap();
    let summary = loader.full_pass().await.unwrap();
    assert_eq!(summary.files, 0);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.entries, 0);
    assert!(store.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn generated_ids_skip_parsing_unchanged_files() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));

    let parser = Arc::new(CountingParser::default());
    let store = memory_store();
    let generate: GenerateId =
        Arc::new(|input: &IdInput<'_>| input.record.last_name.to_lowercase());
    let mut loader = Loader::new(site.config(), Arc::clone(&store))
        .with_parser(parser.clone())
        .with_generate_id(generate);

    loader.run().await.unwrap();
    assert_eq!(store.keys().await.unwrap(), vec!["alpha"]);

    let summary = loader.full_pass().await.unwrap();
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.removed, 0);
    assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.keys().await.unwrap(), vec!["alpha"]);
}

#[tokio::test]
async fn run_starts_from_an_empty_store() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();
    store.add_module_import("stale.docx").await.unwrap();

    loader.run().await.unwrap();
    assert_eq!(store.keys().await.unwrap(), vec!["a"]);
    assert!(store.module_imports().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrency_is_bounded() {
    let site = Site::new();
    for i in 0..8 {
        site.write(&format!("bio-{}.docx", i), &biography("GAMMA", "Gil", "."));
    }

    let parser = Arc::new(CountingParser {
        delay_ms: 30,
        ..CountingParser::default()
    });
    let config = LoaderConfig {
        concurrency: 2,
        ..site.config()
    };
    let store = memory_store();
    let mut loader = Loader::new(config, Arc::clone(&store)).with_parser(parser.clone());
    let summary = loader.run().await.unwrap().unwrap();

    assert_eq!(summary.created, 8);
    assert_eq!(parser.calls.load(Ordering::SeqCst), 8);
    assert!(parser.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn unreadable_document_still_gets_an_entry() {
    let site = Site::new();
    site.write("broken.docx", b"this is not a zip archive");

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    let summary = loader.run().await.unwrap().unwrap();
    assert_eq!(summary.failed, 1);

    let entry = store.get("broken").await.unwrap().unwrap();
    assert_eq!(entry.data.title, "broken");
    assert_eq!(entry.data.first_name, "");
    assert_eq!(entry.data.life, "");
    assert_eq!(entry.rendered.unwrap().html, EMPTY_BODY_PLACEHOLDER);
}

#[tokio::test]
async fn missing_base_directory_is_a_warning() {
    let tmp = TempDir::new().unwrap();
    let config = LoaderConfig {
        root: tmp.path().to_path_buf(),
        collection: "nowhere".into(),
        ..LoaderConfig::default()
    };
    let store = memory_store();
    let mut loader = Loader::new(config, Arc::clone(&store));
    assert!(loader.run().await.unwrap().is_none());
    assert!(loader.base_dir().is_none());
    assert!(!loader
        .handle_event(WatchEvent::Add(tmp.path().join("a.docx")))
        .await
        .unwrap());
}

#[tokio::test]
async fn empty_base_directory_loads_nothing() {
    let site = Site::new();
    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    let summary = loader.run().await.unwrap().unwrap();
    assert_eq!(summary.files, 0);
    assert!(store.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn retain_body_false_drops_body() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));
    let config = LoaderConfig {
        retain_body: false,
        ..site.config()
    };
    let store = memory_store();
    let mut loader = Loader::new(config, Arc::clone(&store));
    loader.run().await.unwrap();

    let entry = store.get("a").await.unwrap().unwrap();
    assert!(entry.body.is_none());
    assert!(entry.rendered.is_some());
}

#[tokio::test]
async fn colliding_ids_keep_one_entry() {
    let site = Site::new();
    site.write("Jane Doe.docx", &biography("DOE", "Jane", "."));
    site.write("jane-doe.docx", &biography("DOE", "Jane", " in 1901."));

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    let summary = loader.run().await.unwrap().unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(store.keys().await.unwrap(), vec!["jane-doe"]);
}

#[tokio::test]
async fn watch_change_add_and_unlink() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();
    let a = resolved(&loader, "a.docx");

    fs::write(&a, biography("ALPHA", "Ann", " and died in 1990.")).unwrap();
    assert!(loader.handle_event(WatchEvent::Change(a.clone())).await.unwrap());
    let entry = store.get("a").await.unwrap().unwrap();
    assert_eq!(entry.data.life, "Was born in Oslo and died in 1990.");

    let b = resolved(&loader, "nested/b.docx");
    site.write("nested/b.docx", &biography("BETA", "Bo", "."));
    assert!(loader.handle_event(WatchEvent::Add(b)).await.unwrap());
    assert!(store.get("nested/b").await.unwrap().is_some());

    fs::remove_file(&a).unwrap();
    assert!(loader.handle_event(WatchEvent::Unlink(a)).await.unwrap());
    assert_eq!(store.keys().await.unwrap(), vec!["nested/b"]);
}

#[tokio::test]
async fn watch_rename_moves_the_entry() {
    let site = Site::new();
    site.write("old-name.docx", &biography("ALPHA", "Ann", "."));

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();

    let old = resolved(&loader, "old-name.docx");
    let new = resolved(&loader, "new-name.docx");
    fs::rename(&old, &new).unwrap();
    loader.handle_event(WatchEvent::Unlink(old)).await.unwrap();
    loader.handle_event(WatchEvent::Add(new)).await.unwrap();

    assert_eq!(store.keys().await.unwrap(), vec!["new-name"]);
    let entry = store.get("new-name").await.unwrap().unwrap();
    assert_eq!(entry.file_path, "src/content/biographies/new-name.docx");
}

#[tokio::test]
async fn watch_ignores_unmatched_paths() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));

    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();

    let txt = resolved(&loader, "notes.txt");
    fs::write(&txt, b"x").unwrap();
    assert!(!loader.handle_event(WatchEvent::Add(txt)).await.unwrap());

    let outside = site.root.join("elsewhere.docx");
    fs::write(&outside, biography("OUT", "Side", ".")).unwrap();
    assert!(!loader.handle_event(WatchEvent::Add(outside)).await.unwrap());

    assert_eq!(store.keys().await.unwrap(), vec!["a"]);
}

#[tokio::test]
async fn watch_unlink_of_unknown_file_is_harmless() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));
    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();

    let ghost = resolved(&loader, "ghost.docx");
    assert!(loader.handle_event(WatchEvent::Unlink(ghost)).await.unwrap());
    assert_eq!(store.keys().await.unwrap(), vec!["a"]);
}

#[tokio::test]
async fn watch_loop_applies_events_in_order() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));
    let store = memory_store();
    let mut loader = Loader::new(site.config(), Arc::clone(&store));
    loader.run().await.unwrap();

    let a = resolved(&loader, "a.docx");
    let (tx, rx) = tokio::sync::mpsc::channel(8);
    fs::remove_file(&a).unwrap();
    tx.send(WatchEvent::Unlink(a.clone())).await.unwrap();
    tx.send(WatchEvent::Unlink(a)).await.unwrap();
    drop(tx);

    loader.watch(rx).await.unwrap();
    assert!(store.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn changed_id_deletes_the_old_entry() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));

    let store = memory_store();
    let generate: GenerateId =
        Arc::new(|input: &IdInput<'_>| input.record.last_name.to_lowercase());
    let mut loader = Loader::new(site.config(), Arc::clone(&store)).with_generate_id(generate);
    loader.run().await.unwrap();
    assert_eq!(store.keys().await.unwrap(), vec!["alpha"]);

    let a = resolved(&loader, "a.docx");
    fs::write(&a, biography("OMEGA", "Ann", ".")).unwrap();
    loader.handle_event(WatchEvent::Change(a)).await.unwrap();
    assert_eq!(store.keys().await.unwrap(), vec!["omega"]);
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, input: &RenderInput<'_>) -> Result<RenderedContent, RenderError> {
        Err(RenderError::Failed {
            id: input.id.to_string(),
            message: "boom".into(),
        })
    }
}

#[tokio::test]
async fn render_failure_stores_entry_without_rendered() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));
    let store = memory_store();
    let mut loader =
        Loader::new(site.config(), Arc::clone(&store)).with_renderer(Arc::new(FailingRenderer));
    loader.run().await.unwrap();

    let entry = store.get("a").await.unwrap().unwrap();
    assert!(entry.rendered.is_none());
    assert_eq!(entry.data.last_name, "Alpha");
}

struct DeferredRenderer;

impl Renderer for DeferredRenderer {
    fn render(&self, input: &RenderInput<'_>) -> Result<RenderedContent, RenderError> {
        Ok(RenderedContent {
            html: input.body.to_string(),
            ..RenderedContent::default()
        })
    }

    fn deferred(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn deferred_entries_register_module_imports() {
    let site = Site::new();
    site.write("a.docx", &biography("ALPHA", "Ann", "."));
    let store = memory_store();
    let mut loader =
        Loader::new(site.config(), Arc::clone(&store)).with_renderer(Arc::new(DeferredRenderer));
    loader.run().await.unwrap();

    assert!(store.get("a").await.unwrap().unwrap().deferred_render);
    assert_eq!(
        store.module_imports().await.unwrap(),
        vec!["src/content/biographies/a.docx"]
    );
}
