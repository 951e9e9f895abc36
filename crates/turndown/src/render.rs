//! Rendered-text support.
//!
//! Some rules need the text a browser would show for a subtree (`innerText`)
//! rather than its raw markup. A [`RenderContext`] is a one-slot scratch
//! container that plays the role of a live document body: a node is attached,
//! its rendered text is read, and the node is detached again when the
//! [`Attached`] guard goes out of scope.

use std::sync::{Mutex, MutexGuard, TryLockError};

use crate::node::{Node, NodeType};
use crate::utilities::{collapse_whitespace, is_block, is_preformatted};

/// Elements that never contribute rendered text
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "template", "noscript", "title"];

/// Errors raised while attaching a node to a render context
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render context is already holding an attached node")]
    Busy,

    #[error("only element nodes can be attached, got {0}")]
    NotAnElement(String),
}

/// A scratch container nodes are attached to for rendering.
#[derive(Debug, Default)]
pub struct RenderContext {
    slot: Mutex<Option<Node>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `node` to the context.
    ///
    /// The node stays attached until the returned guard is dropped. A panic
    /// while attached still detaches, so a poisoned slot is recovered.
    pub fn attach(&self, node: Node) -> Result<Attached<'_>, RenderError> {
        if !node.is_element() {
            return Err(RenderError::NotAnElement(node.node_name));
        }

        let mut slot = match self.slot.try_lock() {
            Ok(slot) => slot,
            Err(TryLockError::WouldBlock) => return Err(RenderError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        if slot.is_some() {
            return Err(RenderError::Busy);
        }

        *slot = Some(node);
        Ok(Attached { slot })
    }

    /// True when nothing is attached
    pub fn is_empty(&self) -> bool {
        match self.slot.try_lock() {
            Ok(slot) => slot.is_none(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_none(),
            Err(TryLockError::WouldBlock) => false,
        }
    }
}

/// A node attached to a [`RenderContext`]. Dropping it detaches the node.
pub struct Attached<'a> {
    slot: MutexGuard<'a, Option<Node>>,
}

impl Attached<'_> {
    /// The attached node
    pub fn node(&self) -> Option<&Node> {
        self.slot.as_ref()
    }

    /// Rendered text of the attached node
    pub fn inner_text(&self) -> String {
        self.slot.as_ref().map(inner_text).unwrap_or_default()
    }
}

impl Drop for Attached<'_> {
    fn drop(&mut self) {
        self.slot.take();
    }
}

/// One piece of rendered output.
enum Item {
    /// Text whose whitespace collapses (outside preformatted elements)
    Collapsible(String),
    /// Text kept as written
    Preserved(String),
    /// A `br`
    Newline,
    /// A request for at least this many line breaks
    Breaks(usize),
}

/// Compute the rendered text of `node` following the browser `innerText`
/// model: whitespace collapses outside preformatted elements, also across
/// element boundaries, and is trimmed at line starts and ends; `br` becomes
/// a newline; block boundaries turn into line breaks that never lead or
/// trail the result.
pub fn inner_text(node: &Node) -> String {
    let mut items = Vec::new();
    collect(node, is_preformatted(&node.tag_name()), &mut items);

    let mut out = String::new();
    let mut pending = 0;
    // `out` ends in a space that came from collapsible text
    let mut soft_space = false;

    for item in items {
        let (text, collapsible) = match item {
            Item::Breaks(n) => {
                pending = pending.max(n);
                continue;
            }
            Item::Newline => ("\n".to_string(), false),
            Item::Preserved(text) => (text, false),
            Item::Collapsible(text) => {
                let text = collapse_whitespace(&text);
                let line_start = out.is_empty() || pending > 0 || out.ends_with('\n');
                if line_start || soft_space {
                    (text.trim_start().to_string(), true)
                } else {
                    (text, true)
                }
            }
        };
        if text.is_empty() {
            continue;
        }

        if soft_space && (pending > 0 || text.starts_with('\n')) {
            out.pop();
        }
        if pending > 0 && !out.is_empty() {
            out.push_str(&"\n".repeat(pending));
        }
        pending = 0;
        out.push_str(&text);
        soft_space = collapsible && text.ends_with(' ');
    }

    if soft_space {
        out.pop();
    }
    out
}

fn collect(node: &Node, preformatted: bool, items: &mut Vec<Item>) {
    for child in node.children() {
        match child.node_type {
            NodeType::Text => {
                let text = child.node_value.clone().unwrap_or_default();
                items.push(if preformatted {
                    Item::Preserved(text)
                } else {
                    Item::Collapsible(text)
                });
            }
            NodeType::Element => {
                let tag = child.tag_name();
                if HIDDEN_ELEMENTS.contains(&tag.as_str()) {
                    continue;
                }
                if tag == "br" {
                    items.push(Item::Newline);
                    continue;
                }

                let breaks = if tag == "p" {
                    2
                } else if is_block(&tag) {
                    1
                } else {
                    0
                };
                if breaks > 0 {
                    items.push(Item::Breaks(breaks));
                }
                collect(child, preformatted || is_preformatted(&tag), items);
                if breaks > 0 {
                    items.push(Item::Breaks(breaks));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(node: &Node) -> String {
        let context = RenderContext::new();
        let attached = context.attach(node.clone()).unwrap();
        attached.inner_text()
    }

    #[test]
    fn test_pre_keeps_whitespace_and_strips_tags() {
        let pre = Node::element("pre")
            .with_child(Node::text("fn main() {\n    "))
            .with_child(Node::element("span").with_child(Node::text("println!")))
            .with_child(Node::text("();\n}"));

        assert_eq!(text_of(&pre), "fn main() {\n    println!();\n}");
    }

    #[test]
    fn test_br_is_a_newline() {
        let pre = Node::element("pre")
            .with_child(Node::text("a"))
            .with_child(Node::element("br"))
            .with_child(Node::text("b"));

        assert_eq!(text_of(&pre), "a\nb");
    }

    #[test]
    fn test_block_children_break_lines() {
        let div = Node::element("div")
            .with_child(Node::element("div").with_child(Node::text("one")))
            .with_child(Node::element("div").with_child(Node::text("two")))
            .with_child(Node::element("p").with_child(Node::text("three")));

        assert_eq!(text_of(&div), "one\ntwo\n\nthree");
    }

    #[test]
    fn test_whitespace_collapses_outside_pre() {
        let div = Node::element("div").with_child(Node::text("a   \n  b"));
        assert_eq!(inner_text(&div), "a b");
    }

    #[test]
    fn test_whitespace_collapses_across_elements() {
        let div = Node::element("div")
            .with_child(Node::text("  a "))
            .with_child(Node::element("span").with_child(Node::text(" b ")))
            .with_child(Node::element("br"))
            .with_child(Node::text("  c  "));

        assert_eq!(inner_text(&div), "a b\nc");
    }

    #[test]
    fn test_line_edges_are_trimmed_around_blocks() {
        let div = Node::element("div")
            .with_child(Node::text("one "))
            .with_child(Node::element("div").with_child(Node::text("  two  ")))
            .with_child(Node::text(" three"));

        assert_eq!(inner_text(&div), "one\ntwo\nthree");
    }

    #[test]
    fn test_hidden_elements_render_nothing() {
        let pre = Node::element("pre")
            .with_child(Node::element("style").with_child(Node::text("x {}")))
            .with_child(Node::text("shown"));

        assert_eq!(inner_text(&pre), "shown");
    }

    #[test]
    fn test_detaches_on_drop() {
        let context = RenderContext::new();
        {
            let attached = context.attach(Node::element("pre")).unwrap();
            assert!(attached.node().is_some());
            assert!(!context.is_empty());
        }
        assert!(context.is_empty());
        assert!(context.attach(Node::element("pre")).is_ok());
    }

    #[test]
    fn test_second_attach_is_busy() {
        let context = RenderContext::new();
        let _held = context.attach(Node::element("pre")).unwrap();
        assert!(matches!(
            context.attach(Node::element("pre")),
            Err(RenderError::Busy)
        ));
    }

    #[test]
    fn test_panic_while_attached_leaves_context_usable() {
        let context = RenderContext::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _attached = context.attach(Node::element("pre")).unwrap();
            panic!("render failed");
        }));
        assert!(result.is_err());

        assert!(context.is_empty());
        let attached = context.attach(Node::element("pre").with_child(Node::text("ok"))).unwrap();
        assert_eq!(attached.inner_text(), "ok");
    }

    #[test]
    fn test_text_nodes_cannot_attach() {
        let context = RenderContext::new();
        assert!(matches!(
            context.attach(Node::text("x")),
            Err(RenderError::NotAnElement(_))
        ));
        assert!(context.is_empty());
    }
}
