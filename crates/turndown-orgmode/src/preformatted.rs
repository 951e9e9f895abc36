//! `<pre>` blocks that do not start with a `<code>` child.
//!
//! Such blocks come from pages that mark up highlighted code themselves, so
//! the body is recovered one of two ways. A block tagged with a
//! `code-lang-<name>` id is rendered to the text a reader would see, which
//! drops the highlighting markup. An untagged block keeps its inner markup
//! verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use turndown::{Filter, Node, NodeRef, RenderContext, Result, Rule};

use crate::rules::{source_block, starts_with_code, SRC_BEGIN};

/// Placeholder an upstream step substitutes for `<br>` inside `<pre>`
pub const BR_PLACEHOLDER: &str = "br-keep";

static ID_LANGUAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"code-lang-(.+)").unwrap());

/// The `pre` rule. Each conversion renders through its own context, so
/// concurrent conversions never contend for one.
pub fn pre_rule() -> Rule {
    Rule::fallible(
        Filter::predicate(|tag, node, _| tag == "pre" && !starts_with_code(node)),
        |node, _, _| convert_pre(node, &RenderContext::new()),
    )
}

/// Convert a `<pre>` into a source block.
///
/// The live node is never modified: placeholders are restored on a copy, and
/// it is the copy that gets attached to `context` for rendering.
pub fn convert_pre(node: &NodeRef, context: &RenderContext) -> Result<String> {
    let mut pre = node.node.clone();
    restore_line_breaks(&mut pre);

    let language = language_from_id(pre.attr("id"));

    let code = if language.is_empty() {
        tracing::debug!("pre without language, keeping inner markup");
        pre.inner_html()
    } else {
        tracing::debug!(language = %language, "pre with language, rendering text");
        let attached = context.attach(pre)?;
        attached.inner_text()
    };

    Ok(source_block(SRC_BEGIN, &language, &code))
}

/// Extract `<name>` from an id of the form `code-lang-<name>`
pub fn language_from_id(id: Option<&str>) -> String {
    id.and_then(|id| ID_LANGUAGE.captures(id))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Turn every bare `<br-keep></br-keep>` placeholder under `node` back into
/// a `<br>`. A `br-keep` with attributes or content is not a placeholder and
/// is left alone.
pub fn restore_line_breaks(node: &mut Node) {
    let Some(children) = node.children.as_mut() else {
        return;
    };

    for child in children.iter_mut() {
        if is_placeholder(child) {
            *child = Node::element("br");
        } else {
            restore_line_breaks(child);
        }
    }
}

fn is_placeholder(node: &Node) -> bool {
    node.is_tag(BR_PLACEHOLDER)
        && node.children().next().is_none()
        && node.attributes.as_ref().map_or(true, Vec::is_empty)
}
