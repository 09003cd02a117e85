//! Parsed office-document tree.
//!
//! A [`SourceDocument`] is the transient result of parsing one DOCX file: an
//! ordered list of top-level block nodes plus any extracted attachments. It
//! lives for the duration of a single sync pass and is never persisted.

use serde::Serialize;

/// Structural type of a [`DocNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Paragraph,
    Heading,
    /// A single list item. Sibling items are not grouped into a list.
    List,
    Table,
    Row,
    Cell,
    Text,
    /// Any node type the transformer has no tag for.
    Other(String),
}

/// Inline formatting flags of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Formatting {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Formatting {
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }
}

/// Per-node metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeMetadata {
    /// Heading depth as declared by the paragraph style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Raw paragraph style id, when one was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// One node of the document tree.
///
/// Block nodes hold their inline runs (or nested blocks, for tables) in
/// `children`; `text` is always the concatenated plain text of the subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocNode {
    pub kind: NodeKind,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocNode>,
    #[serde(skip_serializing_if = "Formatting::is_plain")]
    pub formatting: Formatting,
    pub metadata: NodeMetadata,
}

impl DocNode {
    /// Block node whose `text` is derived from its children.
    pub fn block(kind: NodeKind, children: Vec<DocNode>) -> Self {
        let separator = match kind {
            NodeKind::Table | NodeKind::Row => " ",
            NodeKind::Cell => "\n",
            _ => "",
        };
        let text = children
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(separator);
        Self {
            kind,
            text,
            children,
            formatting: Formatting::default(),
            metadata: NodeMetadata::default(),
        }
    }

    pub fn paragraph(children: Vec<DocNode>) -> Self {
        Self::block(NodeKind::Paragraph, children)
    }

    pub fn heading(level: u8, children: Vec<DocNode>) -> Self {
        let mut node = Self::block(NodeKind::Heading, children);
        node.metadata.level = Some(level);
        node
    }

    pub fn text(text: impl Into<String>, formatting: Formatting) -> Self {
        Self {
            kind: NodeKind::Text,
            text: text.into(),
            children: Vec::new(),
            formatting,
            metadata: NodeMetadata::default(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::text(text, Formatting::default())
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::text(
            text,
            Formatting {
                bold: true,
                ..Formatting::default()
            },
        )
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind == NodeKind::Paragraph
    }

    /// True when the node's first child is a bold run, which marks a
    /// section header in the biography layout.
    pub fn starts_bold(&self) -> bool {
        self.children
            .first()
            .map(|c| c.formatting.bold)
            .unwrap_or(false)
    }

    /// Recompute `text` after children were edited.
    pub fn refresh_text(&mut self) {
        if self.kind != NodeKind::Text {
            self.text = self.children.iter().map(|c| c.text.as_str()).collect();
        }
    }
}

/// A binary payload extracted from the document package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub mime_type: String,
    /// Base64 (standard alphabet) encoded bytes.
    pub data: String,
    pub name: Option<String>,
    pub extension: Option<String>,
}

/// The parsed tree for one input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceDocument {
    pub content: Vec<DocNode>,
    pub attachments: Vec<Attachment>,
}
