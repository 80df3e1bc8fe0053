//! Flat, sibling-ordered view of a semi-structured document.
//!
//! Menu pages are a run of headings, paragraphs and lists that all sit next
//! to each other under one content container. [`DocumentNode`] captures the
//! little the extractor needs from such a tree (kind, text, next sibling,
//! children) so the walking logic works on parsed HTML ([`HtmlNode`]) and on
//! the hand-built trees the tests use alike.
//!
//! [`extract_section`] picks the nodes that belong to one named section:
//! everything after the first heading mentioning the name, up to the next
//! heading at the same (or a shallower) level.

use crate::error::MenuError;
use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};

/// What a node is, as far as menu extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `h1`..`h6`; the payload is the level.
    Heading(u8),
    Paragraph,
    List,
    ListItem,
    Other,
}

/// Read-only traversal over a document node.
pub trait DocumentNode: Sized {
    fn kind(&self) -> NodeKind;

    /// Raw text content, including descendants. Not normalized.
    fn text(&self) -> String;

    /// The next node at the same depth, if any.
    fn next_sibling(&self) -> Option<Self>;

    /// Direct child nodes in document order.
    fn children(&self) -> Vec<Self>;
}

/// An element of a page parsed with `scraper`. Text and comment nodes
/// between elements are skipped.
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(pub ElementRef<'a>);

impl<'a> HtmlNode<'a> {
    /// First element child of the first element matching `selector`.
    ///
    /// Returns `Ok(None)` when nothing matches or the container is empty.
    pub fn first_in(document: &'a Html, selector: &str) -> Result<Option<Self>, MenuError> {
        let selector =
            Selector::parse(selector).map_err(|_| MenuError::Selector(selector.to_string()))?;
        Ok(document
            .select(&selector)
            .next()
            .and_then(|root| root.children().find_map(ElementRef::wrap))
            .map(HtmlNode))
    }
}

impl DocumentNode for HtmlNode<'_> {
    fn kind(&self) -> NodeKind {
        match self.0.value().name() {
            "h1" => NodeKind::Heading(1),
            "h2" => NodeKind::Heading(2),
            "h3" => NodeKind::Heading(3),
            "h4" => NodeKind::Heading(4),
            "h5" => NodeKind::Heading(5),
            "h6" => NodeKind::Heading(6),
            "p" => NodeKind::Paragraph,
            "ul" | "ol" => NodeKind::List,
            "li" => NodeKind::ListItem,
            _ => NodeKind::Other,
        }
    }

    fn text(&self) -> String {
        self.0.text().collect()
    }

    fn next_sibling(&self) -> Option<Self> {
        self.0.next_siblings().find_map(ElementRef::wrap).map(HtmlNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children().filter_map(ElementRef::wrap).map(HtmlNode).collect()
    }
}

/// Collect the nodes of the section whose heading mentions `section_name`.
///
/// Walks the sibling chain starting at `first`. The first heading whose text
/// contains `section_name` anchors the section; the nodes after it are
/// returned up to, not including, the next heading of the same or a
/// shallower level. Deeper headings stay inside the section. A missing
/// section yields an empty `Vec`.
pub fn extract_section<N: DocumentNode>(first: Option<N>, section_name: &str) -> Vec<N> {
    let mut cursor = first;
    let anchor_level = loop {
        let Some(node) = cursor else {
            return Vec::new();
        };
        cursor = node.next_sibling();
        if let NodeKind::Heading(level) = node.kind() {
            if collapse_whitespace(&node.text()).contains(section_name) {
                break level;
            }
        }
    };

    let mut section = Vec::new();
    while let Some(node) = cursor {
        if let NodeKind::Heading(level) = node.kind() {
            if level <= anchor_level {
                break;
            }
        }
        cursor = node.next_sibling();
        section.push(node);
    }
    section
}


#[cfg(test)]
mod tests {
    use super::fixtures::{ContentNode, FlatNode};
    use super::*;

    fn sample() -> Vec<ContentNode> {
        vec![
            ContentNode::heading(2, "Opening hours"),
            ContentNode::paragraph("12:00 - 14:00"),
            ContentNode::heading(2, "This week's menu"),
            ContentNode::heading(3, "Main Course"),
            ContentNode::list(&["Monday – Pasta", "Tuesday – Fish"]),
            ContentNode::heading(2, "Allergens"),
            ContentNode::paragraph("Ask staff"),
        ]
    }

    fn texts(nodes: &[FlatNode<'_>]) -> Vec<String> {
        nodes.iter().map(|n| n.text()).collect()
    }

    #[test]
    fn test_extracts_until_same_level_heading() {
        let doc = sample();
        let section = extract_section(FlatNode::first(&doc), "menu");
        assert_eq!(
            texts(&section),
            vec!["Main Course", "Monday – Pasta Tuesday – Fish"]
        );
    }

    #[test]
    fn test_missing_section_is_empty() {
        let doc = sample();
        assert!(extract_section(FlatNode::first(&doc), "Breakfast").is_empty());
        let empty: Vec<ContentNode> = Vec::new();
        assert!(extract_section(FlatNode::first(&empty), "menu").is_empty());
    }

    #[test]
    fn test_first_matching_heading_wins() {
        let doc = vec![
            ContentNode::heading(2, "Menu A"),
            ContentNode::paragraph("first"),
            ContentNode::heading(2, "Menu B"),
            ContentNode::paragraph("second"),
        ];
        let section = extract_section(FlatNode::first(&doc), "Menu");
        assert_eq!(texts(&section), vec!["first"]);
    }

    #[test]
    fn test_section_runs_to_end_of_document() {
        let doc = sample();
        let section = extract_section(FlatNode::first(&doc), "Allergens");
        assert_eq!(texts(&section), vec!["Ask staff"]);
    }

    #[test]
    fn test_shallower_heading_ends_section() {
        let doc = vec![
            ContentNode::heading(2, "Menu"),
            ContentNode::paragraph("inside"),
            ContentNode::heading(1, "Footer"),
            ContentNode::paragraph("outside"),
        ];
        let section = extract_section(FlatNode::first(&doc), "Menu");
        assert_eq!(texts(&section), vec!["inside"]);
    }

    #[test]
    fn test_flat_node_children() {
        let doc = vec![ContentNode::list(&["a", "b"])];
        let list = FlatNode::first(&doc).unwrap();
        let children = list.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].kind(), NodeKind::ListItem);
        assert_eq!(children[0].next_sibling().unwrap().text(), "b");
        assert!(children[1].next_sibling().is_none());
    }

    #[test]
    fn test_html_nodes_skip_text_and_nest_only_top_level() {
        let html = Html::parse_document(
            r#"<div class="entry">
                 <h2>Lunch Menu</h2>
                 text between
                 <div><h2>Nested</h2></div>
                 <ul><li>Soup</li><li>Bread</li></ul>
                 <h2>Other</h2>
               </div>"#,
        );
        let first = HtmlNode::first_in(&html, ".entry").unwrap();
        let section = extract_section(first, "Lunch");
        let kinds: Vec<NodeKind> = section.iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Other, NodeKind::List]);
        assert_eq!(section[1].children().len(), 2);
    }

    #[test]
    fn test_html_bad_selector() {
        let html = Html::parse_document("<p>x</p>");
        let err = HtmlNode::first_in(&html, "[[").unwrap_err();
        assert!(matches!(err, MenuError::Selector(_)));
    }
}
