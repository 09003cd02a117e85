//! Minimal HTML-oriented tree and its serializer.
//!
//! The transformer builds [`Markup`] values; [`to_html`] turns them into the
//! HTML strings stored on a biography record. Only text content is escaped:
//! the tree carries no attributes, so there is nothing else to sanitize.

/// An HTML node: element, text, or a wrapper-less run of siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element {
        tag: String,
        children: Vec<Markup>,
    },
    Text(String),
    Fragment(Vec<Markup>),
}

impl Markup {
    pub fn element(tag: impl Into<String>, children: Vec<Markup>) -> Self {
        Markup::Element {
            tag: tag.into(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    /// Serialize this node to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self);
        out
    }
}

/// Serialize a sequence of sibling nodes.
pub fn to_html(nodes: &[Markup]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Markup) {
    match node {
        Markup::Text(text) => escape_into(out, text),
        Markup::Fragment(children) => {
            for child in children {
                write_node(out, child);
            }
        }
        Markup::Element { tag, children } => {
            out.push('<');
            out.push_str(tag);
            out.push('>');
            for child in children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
