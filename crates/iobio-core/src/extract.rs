//! Biography field extraction.
//!
//! Runs the ordered heuristics over a parsed [`SourceDocument`] and splits
//! it into a [`BiographyRecord`] plus the narrative body. Nodes consumed by
//! a step are *claimed* by their index in the top-level block list; the body
//! is whatever no step claimed.
//!
//! # Steps
//!
//! 1. `Source:` paragraph → image attribution.
//! 2. First block → name, life, title, organisation, nationality, years.
//! 3. `Version…` paragraph.
//! 4. Citation paragraph → authors (plus the first paragraph mentioning them).
//! 5. `ARCHIVES`, `PUBLICATIONS`, `LITERATURE` sections.
//! 6. "How to cite this IO BIO entry" paragraph.
//! 7. Unclaimed blocks → body HTML.
//! 8. First attachment → image.
//!
//! Each step is skipped when its anchor is missing. Missing intro anchors
//! downgrade the outcome to [`ExtractionStatus::Partial`].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::document::{DocNode, SourceDocument};
use crate::heuristics;
use crate::models::BiographyRecord;
use crate::transform::nodes_to_html;

/// Section labels, in extraction order.
pub const SECTION_LABELS: [&str; 3] = ["ARCHIVES", "PUBLICATIONS", "LITERATURE"];

const SOURCE_PREFIX: &str = "Source:";
const VERSION_PREFIX: &str = "Version";
const CITATION_PHRASE: &str = "in IO BIO, Biographical Dictionary of Secretaries-General";
const HOW_TO_CITE_PHRASE: &str = "how to cite this io bio entry";

/// How much of a document could be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// Name, life and title all matched.
    Complete,
    /// The document parsed but some intro anchors did not match.
    Partial { missing: Vec<&'static str> },
    /// The document could not be read; the record holds defaults.
    Failed { error: String },
}

impl ExtractionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionStatus::Complete => "complete",
            ExtractionStatus::Partial { .. } => "partial",
            ExtractionStatus::Failed { .. } => "failed",
        }
    }
}

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    #[serde(flatten)]
    pub status: ExtractionStatus,
    pub record: BiographyRecord,
    /// Narrative body: every unclaimed block, as HTML.
    pub body: String,
    /// Indices of claimed top-level blocks.
    pub claimed: BTreeSet<usize>,
}

impl ExtractionOutcome {
    /// Outcome for a document that could not be parsed.
    pub fn failed(title: &str, error: impl std::fmt::Display) -> Self {
        Self {
            status: ExtractionStatus::Failed {
                error: error.to_string(),
            },
            record: BiographyRecord {
                title: title.to_string(),
                ..BiographyRecord::default()
            },
            body: String::new(),
            claimed: BTreeSet::new(),
        }
    }
}

/// Extract a biography from `doc`. `title` is the source file's stem.
pub fn extract_biography(doc: &SourceDocument, title: &str) -> ExtractionOutcome {
    let content = &doc.content;
    let mut claimed = BTreeSet::new();
    let mut missing = Vec::new();
    let mut record = BiographyRecord {
        title: title.to_string(),
        ..BiographyRecord::default()
    };

    // 1. image attribution
    if let Some((i, node)) = find_paragraph(content, |t| t.starts_with(SOURCE_PREFIX)) {
        if let Some(source) = heuristics::parse_image_source(&node.text) {
            record.image_source = source.value;
            claimed.insert(i);
        }
    }

    // 2. intro sentence
    match content.first() {
        Some(intro) => {
            claimed.insert(0);
            apply_intro(&intro.text, &mut record, &mut missing);
        }
        None => missing.extend(["name", "life", "title"]),
    }

    // 3. version
    if let Some((i, node)) = find_paragraph(content, |t| t.starts_with(VERSION_PREFIX)) {
        record.version = node.text.clone();
        claimed.insert(i);
    }

    // 4. citation
    if let Some((i, node)) = find_paragraph(content, |t| t.contains(CITATION_PHRASE)) {
        record.authors = heuristics::parse_authors(&node.text);
        claimed.insert(i);
    }

    // 5. labelled sections
    for label in SECTION_LABELS {
        let html = match extract_section(content, label, &claimed) {
            Some(section) => {
                claimed.extend(section.indices.iter().copied());
                nodes_to_html(section.nodes.iter())
            }
            None => String::new(),
        };
        match label {
            "ARCHIVES" => record.archives = html,
            "PUBLICATIONS" => record.publications = html,
            _ => record.literature = html,
        }
    }

    // 6. citation footer
    if let Some((i, _)) = find_paragraph(content, |t| {
        t.to_lowercase().contains(HOW_TO_CITE_PHRASE)
    }) {
        claimed.insert(i);
    }

    // The paragraph naming the authors is part of the citation block too.
    if !record.authors.is_empty() {
        let needle = record.authors.to_lowercase();
        if let Some((i, _)) = find_paragraph(content, |t| t.to_lowercase().contains(&needle)) {
            claimed.insert(i);
        }
    }

    // 7. body
    let body = nodes_to_html(
        content
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed.contains(i))
            .map(|(_, n)| n),
    );

    // 8. portrait
    record.image = doc.attachments.first().cloned().map(Into::into);

    record.html = nodes_to_html(content.iter());

    let status = if missing.is_empty() {
        ExtractionStatus::Complete
    } else {
        ExtractionStatus::Partial { missing }
    };

    ExtractionOutcome {
        status,
        record,
        body,
        claimed,
    }
}

fn apply_intro(intro: &str, record: &mut BiographyRecord, missing: &mut Vec<&'static str>) {
    match heuristics::parse_name(intro) {
        Some(name) => {
            record.last_name = name.value.last_name;
            record.first_name = name.value.first_name;
            record.known_as = name.value.known_as;
        }
        None => missing.push("name"),
    }

    match heuristics::parse_life(intro) {
        Some(life) => record.life = life.value,
        None => missing.push("life"),
    }

    let Some(title) = heuristics::parse_title(intro) else {
        missing.push("title");
        return;
    };
    let title = title.value;

    match heuristics::find_organisation(&title) {
        Some(org) => record.organisation = org.value,
        None => tracing::info!(title = %title, "no organisation found in title"),
    }
    if let Some(nat) = heuristics::find_nationality(&title) {
        record.nationality = nat.value.demonym;
        record.country = nat.value.country;
    }
    if let Some(years) = heuristics::parse_years(&title) {
        record.start_year = years.value.start;
        record.end_year = years.value.end;
    }
    record.role = heuristics::role_from_title(&title);
    record.summary = title;
}

fn find_paragraph<F>(content: &[DocNode], pred: F) -> Option<(usize, &DocNode)>
where
    F: Fn(&str) -> bool,
{
    content
        .iter()
        .enumerate()
        .find(|(_, n)| n.is_paragraph() && pred(&n.text))
}

struct Section {
    indices: Vec<usize>,
    nodes: Vec<DocNode>,
}

fn starts_with_section_label(node: &DocNode) -> bool {
    node.is_paragraph() && SECTION_LABELS.iter().any(|l| node.text.starts_with(l))
}

/// Collect the section headed by `label`: the head paragraph with its label
/// removed, then every following unclaimed block up to the next bold-led
/// block, the next section head, or the end.
fn extract_section(content: &[DocNode], label: &str, claimed: &BTreeSet<usize>) -> Option<Section> {
    let start = content
        .iter()
        .enumerate()
        .position(|(i, n)| !claimed.contains(&i) && n.is_paragraph() && n.text.starts_with(label))?;

    let mut head = content[start].clone();
    strip_label(&mut head, label);

    let mut section = Section {
        indices: vec![start],
        nodes: vec![head],
    };

    for (i, node) in content.iter().enumerate().skip(start + 1) {
        if node.starts_bold() || starts_with_section_label(node) {
            break;
        }
        if claimed.contains(&i) {
            continue;
        }
        section.indices.push(i);
        section.nodes.push(node.clone());
    }
    Some(section)
}

/// Drop runs that are just the label or a lone colon, then any label prefix
/// and separator left on the first remaining run.
fn strip_label(head: &mut DocNode, label: &str) {
    head.children.retain(|c| {
        let t = c.text.trim();
        t != label && t != ":"
    });
    if let Some(first) = head.children.first_mut() {
        let t = first.text.trim_start();
        let t = t.strip_prefix(label).unwrap_or(t);
        first.text = t.trim_start_matches([':', ' ']).to_string();
    }
    head.children.retain(|c| !c.text.is_empty());
    head.refresh_text();
}
