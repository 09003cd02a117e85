//! Document tree → markup tree.
//!
//! A pure mapping from [`DocNode`] to [`Markup`]. Text runs are wrapped in
//! their formatting tags with underline innermost and bold outermost; block
//! nodes map to one wrapper element each. List items are emitted as bare
//! `li` elements: grouping consecutive items is left to the caller.

use crate::document::{DocNode, NodeKind};
use crate::markup::{self, Markup};

/// Deepest heading level HTML supports.
const MAX_HEADING_LEVEL: u8 = 6;

/// Transform one document node.
pub fn transform_node(node: &DocNode) -> Markup {
    if node.kind == NodeKind::Text {
        let mut element = Markup::text(node.text.clone());
        if node.formatting.underline {
            element = Markup::element("u", vec![element]);
        }
        if node.formatting.italic {
            element = Markup::element("em", vec![element]);
        }
        if node.formatting.bold {
            element = Markup::element("strong", vec![element]);
        }
        return element;
    }

    let children: Vec<Markup> = node.children.iter().map(transform_node).collect();

    match &node.kind {
        NodeKind::Paragraph => Markup::element("p", children),
        NodeKind::Heading => {
            let level = node
                .metadata
                .level
                .unwrap_or(1)
                .clamp(1, MAX_HEADING_LEVEL);
            Markup::element(format!("h{}", level), children)
        }
        NodeKind::List => Markup::element("li", children),
        NodeKind::Table => Markup::element("table", vec![Markup::element("tbody", children)]),
        NodeKind::Row => Markup::element("tr", children),
        NodeKind::Cell => Markup::element("td", children),
        NodeKind::Text | NodeKind::Other(_) => Markup::Fragment(children),
    }
}

/// Transform a sequence of sibling nodes and serialize the result to HTML.
pub fn nodes_to_html<'a, I>(nodes: I) -> String
where
    I: IntoIterator<Item = &'a DocNode>,
{
    let markup: Vec<Markup> = nodes.into_iter().map(transform_node).collect();
    markup::to_html(&markup)
}
