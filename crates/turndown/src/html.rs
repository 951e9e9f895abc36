//! HTML parsing support.
//!
//! Parses HTML strings with scraper (html5ever) and converts the result to
//! the CDP-style [`Node`] structure used by the service.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree rooted at the `html` element.
///
/// # Example
///
/// ```rust
/// use turndown::{parse_html, TurndownService};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
/// let service = TurndownService::new();
/// let output = service.turndown(&node).unwrap();
/// assert!(output.contains("World"));
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    let mut node = Node::element_with_attrs(tag, attrs);

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => node.add_child(Node::text(&text.text)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
