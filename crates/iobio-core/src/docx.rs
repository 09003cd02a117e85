//! DOCX (WordprocessingML) parsing into a [`SourceDocument`].
//!
//! Reads `word/document.xml` out of the OOXML ZIP package and builds the
//! block/run tree the extractor works on. Images referenced from the body are
//! returned as base64 attachments in document order.
//!
//! Only what the biography layout needs is modelled: paragraphs (plain,
//! heading, list item), tables, and runs with bold/italic/underline. Text
//! boxes, deleted revisions and `mc:Fallback` duplicates are skipped.

use std::collections::HashMap;
use std::io::Read;

use base64::Engine;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::{Attachment, DocNode, Formatting, NodeKind, SourceDocument};

/// Maximum decompressed bytes to read from a single ZIP entry (zip-bomb protection).
const MAX_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

const DOCUMENT_XML: &str = "word/document.xml";
const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
const MEDIA_PREFIX: &str = "word/media/";

/// Subtrees whose content must not reach the document tree.
const SKIPPED_ELEMENTS: &[&[u8]] = &[b"Fallback", b"txbxContent", b"del", b"instrText"];

/// Parser failure. The synchronizer logs it and stores a degraded record.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("not a DOCX package: {0}")]
    Archive(String),
    #[error("{0} not found in package")]
    MissingPart(String),
    #[error("ZIP entry {name} exceeds size limit ({limit} bytes)")]
    EntryTooLarge { name: String, limit: u64 },
    #[error("malformed XML in {part}: {message}")]
    Xml { part: String, message: String },
}

/// Options for a parse call.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub extract_attachments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_attachments: true,
        }
    }
}

/// The document-parser collaborator.
///
/// Implementations must be cheap to share across tasks; the synchronizer
/// calls [`parse`](DocumentParser::parse) from the blocking pool.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, bytes: &[u8], options: &ParseOptions) -> Result<SourceDocument, ParseError>;
}

/// Native DOCX parser built on `zip` and `quick-xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxParser;

impl DocumentParser for DocxParser {
    fn parse(&self, bytes: &[u8], options: &ParseOptions) -> Result<SourceDocument, ParseError> {
        parse_docx(bytes, options)
    }
}

type Archive<'a> = zip::ZipArchive<std::io::Cursor<&'a [u8]>>;

/// Parse DOCX bytes.
pub fn parse_docx(bytes: &[u8], options: &ParseOptions) -> Result<SourceDocument, ParseError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ParseError::Archive(e.to_string()))?;

    if archive.index_for_name(DOCUMENT_XML).is_none() {
        return Err(ParseError::MissingPart(DOCUMENT_XML.to_string()));
    }
    let doc_xml = read_zip_entry_bounded(&mut archive, DOCUMENT_XML, MAX_ENTRY_BYTES)?;
    let body = parse_body(&doc_xml)?;

    let attachments = if options.extract_attachments {
        collect_attachments(&mut archive, &body.image_refs)?
    } else {
        Vec::new()
    };

    Ok(SourceDocument {
        content: body.blocks,
        attachments,
    })
}

fn read_zip_entry_bounded(
    archive: &mut Archive<'_>,
    name: &str,
    max_bytes: u64,
) -> Result<Vec<u8>, ParseError> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ParseError::Archive(e.to_string()))?;
    let mut out = Vec::new();
    entry
        .take(max_bytes)
        .read_to_end(&mut out)
        .map_err(|e| ParseError::Archive(e.to_string()))?;
    if out.len() as u64 >= max_bytes {
        return Err(ParseError::EntryTooLarge {
            name: name.to_string(),
            limit: max_bytes,
        });
    }
    Ok(out)
}

// ── Body ────────────────────────────────────────────────────────────────

struct ParsedBody {
    blocks: Vec<DocNode>,
    /// Relationship ids of embedded images, in document order.
    image_refs: Vec<String>,
}

#[derive(Default)]
struct ParagraphFrame {
    style: Option<String>,
    is_list: bool,
    in_props: bool,
    runs: Vec<DocNode>,
}

#[derive(Default)]
struct RunFrame {
    formatting: Formatting,
    in_props: bool,
    in_text: bool,
    text: String,
}

#[derive(Default)]
struct TableFrame {
    rows: Vec<DocNode>,
    cells: Option<Vec<DocNode>>,
    cell_blocks: Option<Vec<DocNode>>,
}

#[derive(Default)]
struct BodyBuilder {
    blocks: Vec<DocNode>,
    tables: Vec<TableFrame>,
    paragraph: Option<ParagraphFrame>,
    run: Option<RunFrame>,
    image_refs: Vec<String>,
}

impl BodyBuilder {
    fn start(&mut self, e: &BytesStart<'_>, empty: bool) {
        match e.local_name().as_ref() {
            b"p" => {
                self.paragraph = Some(ParagraphFrame::default());
                if empty {
                    self.end_paragraph();
                }
            }
            b"pPr" if !empty => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.in_props = true;
                }
            }
            b"pStyle" => {
                if let Some(p) = self.paragraph.as_mut().filter(|p| p.in_props) {
                    p.style = attr_value(e, b"val");
                }
            }
            b"numPr" => {
                if let Some(p) = self.paragraph.as_mut().filter(|p| p.in_props) {
                    p.is_list = true;
                }
            }
            b"r" if !empty => self.run = Some(RunFrame::default()),
            b"rPr" if !empty => {
                if let Some(r) = self.run.as_mut() {
                    r.in_props = true;
                }
            }
            name @ (b"b" | b"i" | b"u") => {
                if let Some(r) = self.run.as_mut().filter(|r| r.in_props) {
                    let on = toggle_is_on(name, attr_value(e, b"val").as_deref());
                    match name {
                        b"b" => r.formatting.bold = on,
                        b"i" => r.formatting.italic = on,
                        _ => r.formatting.underline = on,
                    }
                }
            }
            b"t" if !empty => {
                if let Some(r) = self.run.as_mut() {
                    r.in_text = true;
                }
            }
            b"tab" => {
                if let Some(r) = self.run.as_mut().filter(|r| !r.in_props) {
                    r.text.push(' ');
                }
            }
            b"br" | b"cr" => {
                if let Some(r) = self.run.as_mut().filter(|r| !r.in_props) {
                    r.text.push('\n');
                }
            }
            b"blip" => {
                if let Some(id) = attr_value(e, b"embed") {
                    if !self.image_refs.contains(&id) {
                        self.image_refs.push(id);
                    }
                }
            }
            b"tbl" if !empty => self.tables.push(TableFrame::default()),
            b"tr" if !empty => {
                if let Some(t) = self.tables.last_mut() {
                    t.cells = Some(Vec::new());
                }
            }
            b"tc" if !empty => {
                if let Some(t) = self.tables.last_mut() {
                    t.cell_blocks = Some(Vec::new());
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, local: &[u8]) {
        match local {
            b"p" => self.end_paragraph(),
            b"pPr" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.in_props = false;
                }
            }
            b"r" => {
                if let Some(run) = self.run.take() {
                    if !run.text.is_empty() {
                        if let Some(p) = self.paragraph.as_mut() {
                            p.runs.push(DocNode::text(run.text, run.formatting));
                        }
                    }
                }
            }
            b"rPr" => {
                if let Some(r) = self.run.as_mut() {
                    r.in_props = false;
                }
            }
            b"t" => {
                if let Some(r) = self.run.as_mut() {
                    r.in_text = false;
                }
            }
            b"tc" => {
                if let Some(t) = self.tables.last_mut() {
                    let blocks = t.cell_blocks.take().unwrap_or_default();
                    let cell = DocNode::block(NodeKind::Cell, blocks);
                    t.cells.get_or_insert_with(Vec::new).push(cell);
                }
            }
            b"tr" => {
                if let Some(t) = self.tables.last_mut() {
                    let cells = t.cells.take().unwrap_or_default();
                    t.rows.push(DocNode::block(NodeKind::Row, cells));
                }
            }
            b"tbl" => {
                if let Some(t) = self.tables.pop() {
                    let table = DocNode::block(NodeKind::Table, t.rows);
                    self.push_block(table);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(r) = self.run.as_mut().filter(|r| r.in_text) {
            r.text.push_str(text);
        }
    }

    fn end_paragraph(&mut self) {
        let Some(frame) = self.paragraph.take() else {
            return;
        };
        let mut node = match heading_level(frame.style.as_deref()) {
            Some(level) => DocNode::heading(level, frame.runs),
            None if frame.is_list => DocNode::block(NodeKind::List, frame.runs),
            None => DocNode::paragraph(frame.runs),
        };
        node.metadata.style = frame.style;
        self.push_block(node);
    }

    /// Blocks land in the innermost open table cell, else at the top level.
    fn push_block(&mut self, node: DocNode) {
        if let Some(cell) = self
            .tables
            .last_mut()
            .and_then(|t| t.cell_blocks.as_mut())
        {
            cell.push(node);
        } else {
            self.blocks.push(node);
        }
    }
}

fn parse_body(xml: &[u8]) -> Result<ParsedBody, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut builder = BodyBuilder::default();
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                } else if SKIPPED_ELEMENTS.contains(&e.local_name().as_ref()) {
                    skip_depth = 1;
                } else {
                    builder.start(&e, false);
                }
            }
            Ok(Event::Empty(e)) => {
                if skip_depth == 0 {
                    builder.start(&e, true);
                }
            }
            Ok(Event::End(e)) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else {
                    builder.end(e.local_name().as_ref());
                }
            }
            Ok(Event::Text(te)) => {
                if skip_depth == 0 {
                    let text = te.unescape().map_err(|e| xml_error(DOCUMENT_XML, e))?;
                    builder.text(&text);
                }
            }
            Ok(Event::CData(cd)) => {
                if skip_depth == 0 {
                    builder.text(&String::from_utf8_lossy(&cd));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(DOCUMENT_XML, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ParsedBody {
        blocks: builder.blocks,
        image_refs: builder.image_refs,
    })
}

fn xml_error(part: &str, e: impl std::fmt::Display) -> ParseError {
    ParseError::Xml {
        part: part.to_string(),
        message: e.to_string(),
    }
}

fn attr_value(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// `<w:b/>` turns bold on; `w:val="0"|"false"|"off"` (and `"none"` for
/// underline) turns it off.
fn toggle_is_on(element: &[u8], val: Option<&str>) -> bool {
    match val {
        None => true,
        Some(v) => {
            let v = v.to_ascii_lowercase();
            let off = matches!(v.as_str(), "0" | "false" | "off");
            !(off || (element == b"u" && v == "none"))
        }
    }
}

/// Heading depth from a paragraph style id: `Heading1`, `heading 2`, `Title`.
fn heading_level(style: Option<&str>) -> Option<u8> {
    let style: String = style?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if style == "title" {
        return Some(1);
    }
    let digits = style.strip_prefix("heading")?;
    if digits.is_empty() {
        return Some(1);
    }
    digits.parse::<u8>().ok()
}

// ── Attachments ─────────────────────────────────────────────────────────

fn collect_attachments(
    archive: &mut Archive<'_>,
    image_refs: &[String],
) -> Result<Vec<Attachment>, ParseError> {
    let mut paths: Vec<String> = Vec::new();
    if !image_refs.is_empty() && archive.index_for_name(DOCUMENT_RELS).is_some() {
        let rels_xml = read_zip_entry_bounded(archive, DOCUMENT_RELS, MAX_ENTRY_BYTES)?;
        let rels = parse_relationships(&rels_xml)?;
        for id in image_refs {
            if let Some(target) = rels.get(id) {
                let path = resolve_part_path(target);
                if archive.index_for_name(&path).is_some() && !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
    }

    if paths.is_empty() {
        paths = archive
            .file_names()
            .filter(|n| n.starts_with(MEDIA_PREFIX) && n.len() > MEDIA_PREFIX.len())
            .map(|s| s.to_string())
            .collect();
        paths.sort();
    }

    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = read_zip_entry_bounded(archive, &path, MAX_ENTRY_BYTES)?;
        out.push(attachment_from_part(&path, &bytes));
    }
    Ok(out)
}

fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, ParseError> {
    let mut rels = HashMap::new();
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let external = attr_value(&e, b"TargetMode")
                        .map(|m| m.eq_ignore_ascii_case("external"))
                        .unwrap_or(false);
                    if let (false, Some(id), Some(target)) =
                        (external, attr_value(&e, b"Id"), attr_value(&e, b"Target"))
                    {
                        rels.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(DOCUMENT_RELS, e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// Relationship targets are relative to `word/` unless absolute.
fn resolve_part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(abs) => abs.to_string(),
        None => format!("word/{}", target.trim_start_matches("./")),
    }
}

fn attachment_from_part(path: &str, bytes: &[u8]) -> Attachment {
    let name = path.rsplit('/').next().unwrap_or(path).to_string();
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let mime_type = mime_for_extension(extension.as_deref()).to_string();
    Attachment {
        kind: "image".to_string(),
        mime_type,
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        name: Some(name),
        extension,
    }
}

fn mime_for_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("emf") => "image/emf",
        Some("wmf") => "image/wmf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn docx_with_body(body: &str, extra: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file(DOCUMENT_XML, zip::write::SimpleFileOptions::default())
                .unwrap();
            let xml = format!(
                "<?xml version=\"1.0\"?><w:document xmlns:w=\"{}\" xmlns:a=\"a\" xmlns:r=\"r\"><w:body>{}</w:body></w:document>",
                W_NS, body
            );
            zip.write_all(xml.as_bytes()).unwrap();
            for (name, data) in extra {
                zip.start_file(*name, zip::write::SimpleFileOptions::default())
                    .unwrap();
                zip.write_all(data).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn invalid_zip_returns_archive_error() {
        let err = parse_docx(b"not a zip", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::Archive(_)));
    }

    #[test]
    fn missing_document_part() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            zip.start_file("word/other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = parse_docx(&buf, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MissingPart(_)));
    }

    #[test]
    fn runs_keep_formatting_and_spacing() {
        let body = "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>ARCHIVES</w:t></w:r>\
                    <w:r><w:t xml:space=\"preserve\">: United Nations </w:t></w:r>\
                    <w:r><w:rPr><w:i/><w:u w:val=\"single\"/></w:rPr><w:t>Geneva</w:t></w:r></w:p>";
        let doc = parse_docx(&docx_with_body(body, &[]), &ParseOptions::default()).unwrap();
        assert_eq!(doc.content.len(), 1);
        let p = &doc.content[0];
        assert_eq!(p.kind, NodeKind::Paragraph);
        assert_eq!(p.text, "ARCHIVES: United Nations Geneva");
        assert_eq!(p.children.len(), 3);
        assert!(p.children[0].formatting.bold);
        assert!(p.children[1].formatting.is_plain());
        assert!(p.children[2].formatting.italic);
        assert!(p.children[2].formatting.underline);
    }

    #[test]
    fn bold_val_false_is_off() {
        let body = "<w:p><w:r><w:rPr><w:b w:val=\"0\"/><w:u w:val=\"none\"/></w:rPr><w:t>x</w:t></w:r></w:p>";
        let doc = parse_docx(&docx_with_body(body, &[]), &ParseOptions::default()).unwrap();
        assert!(doc.content[0].children[0].formatting.is_plain());
    }

    #[test]
    fn headings_lists_and_tables() {
        let body = "<w:p><w:pPr><w:pStyle w:val=\"Heading2\"/></w:pPr><w:r><w:t>Career</w:t></w:r></w:p>\
                    <w:p><w:pPr><w:numPr><w:ilvl w:val=\"0\"/></w:numPr></w:pPr><w:r><w:t>item</w:t></w:r></w:p>\
                    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>1945</w:t></w:r></w:p></w:tc>\
                    <w:tc><w:p><w:r><w:t>UN</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        let doc = parse_docx(&docx_with_body(body, &[]), &ParseOptions::default()).unwrap();
        assert_eq!(doc.content.len(), 3);
        assert_eq!(doc.content[0].kind, NodeKind::Heading);
        assert_eq!(doc.content[0].metadata.level, Some(2));
        assert_eq!(doc.content[1].kind, NodeKind::List);
        let table = &doc.content[2];
        assert_eq!(table.kind, NodeKind::Table);
        assert_eq!(table.children[0].kind, NodeKind::Row);
        assert_eq!(table.children[0].children.len(), 2);
        assert_eq!(table.children[0].children[1].text, "UN");
    }

    #[test]
    fn fallback_content_is_not_duplicated() {
        let body = "<w:p><w:r><w:t>kept</w:t></w:r><mc:AlternateContent xmlns:mc=\"mc\">\
                    <mc:Choice><w:r><w:t>-choice</w:t></w:r></mc:Choice>\
                    <mc:Fallback><w:r><w:t>-fallback</w:t></w:r></mc:Fallback></mc:AlternateContent></w:p>";
        let doc = parse_docx(&docx_with_body(body, &[]), &ParseOptions::default()).unwrap();
        assert_eq!(doc.content[0].text, "kept-choice");
    }

    #[test]
    fn images_resolve_through_relationships() {
        let body = "<w:p><w:r><w:drawing><a:blip r:embed=\"rId7\"/></w:drawing></w:r></w:p>";
        let rels = b"<?xml version=\"1.0\"?><Relationships><Relationship Id=\"rId7\" Type=\"image\" Target=\"media/image2.jpeg\"/></Relationships>";
        let bytes = docx_with_body(
            body,
            &[
                (DOCUMENT_RELS, rels.as_slice()),
                ("word/media/image1.png", b"first".as_slice()),
                ("word/media/image2.jpeg", b"second".as_slice()),
            ],
        );
        let doc = parse_docx(&bytes, &ParseOptions::default()).unwrap();
        assert_eq!(doc.attachments.len(), 1);
        let img = &doc.attachments[0];
        assert_eq!(img.name.as_deref(), Some("image2.jpeg"));
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.extension.as_deref(), Some("jpeg"));
        assert_eq!(img.data, "c2Vjb25k");
    }

    #[test]
    fn unreferenced_media_fall_back_to_name_order() {
        let bytes = docx_with_body(
            "<w:p/>",
            &[
                ("word/media/image2.png", b"b".as_slice()),
                ("word/media/image1.png", b"a".as_slice()),
            ],
        );
        let doc = parse_docx(&bytes, &ParseOptions::default()).unwrap();
        assert_eq!(doc.attachments.len(), 2);
        assert_eq!(doc.attachments[0].name.as_deref(), Some("image1.png"));

        let none = parse_docx(
            &bytes,
            &ParseOptions {
                extract_attachments: false,
            },
        )
        .unwrap();
        assert!(none.attachments.is_empty());
    }

    #[test]
    fn heading_level_from_style() {
        assert_eq!(heading_level(Some("Heading3")), Some(3));
        assert_eq!(heading_level(Some("heading 1")), Some(1));
        assert_eq!(heading_level(Some("Title")), Some(1));
        assert_eq!(heading_level(Some("Normal")), None);
        assert_eq!(heading_level(None), None);
    }
}
