//! Host default rules.
//!
//! These cover the structural elements every output dialect needs and that
//! plugins usually leave alone. Plugin rules are consulted before them.

use super::{Filter, Rule};
use crate::node::NodeRef;

/// Create all base rules, named
pub fn base_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("paragraph", paragraph_rule()),
        ("lineBreak", line_break_rule()),
        ("blockquote", blockquote_rule()),
        ("list", list_rule()),
        ("listItem", list_item_rule()),
        ("horizontalRule", horizontal_rule()),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content.lines().map(|line| format!("> {}", line)).collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::new(Filter::tags(&["ul", "ol"]), |node, content, _| {
        let content = content.trim();
        if node.parent_tag().as_deref() == Some("li") {
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let content = content
            .trim()
            .replace("\n\n\n", "\n\n")
            .replace('\n', "\n    ");

        let prefix = match ordinal(node) {
            Some(n) => format!("{}.  ", n),
            None => format!("{}   ", options.bullet_list_marker),
        };

        format!("{}{}\n", prefix, content)
    })
}

/// Number of an `li` inside an `ol`, honouring the list's `start`
fn ordinal(node: &NodeRef) -> Option<usize> {
    let parent = node.parent().filter(|p| p.is_tag("ol"))?;
    let start = parent
        .attr("start")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1);
    let position = parent
        .children()
        .take(node.index())
        .filter(|c| c.is_tag("li"))
        .count();
    Some(start + position)
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::service::TurndownOptions;

    fn rule(name: &str) -> Rule {
        base_rules()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, r)| r)
            .unwrap()
    }

    #[test]
    fn test_ordered_items_count_li_siblings() {
        let ol = Node::element_with_attrs("ol", vec![("start", "3")])
            .with_child(Node::element("li"))
            .with_child(Node::text("\n"))
            .with_child(Node::element("li"));
        let options = TurndownOptions::default();
        let item = rule("listItem");

        let second = NodeRef::child_of(&ol, 2).unwrap();
        assert_eq!(item.replace(&second, "Two", &options).unwrap(), "4.  Two\n");
    }

    #[test]
    fn test_unordered_items_use_marker() {
        let ul = Node::element("ul").with_child(Node::element("li"));
        let options = TurndownOptions::default();
        let first = NodeRef::child_of(&ul, 0).unwrap();

        assert_eq!(rule("listItem").replace(&first, "One", &options).unwrap(), "*   One\n");
    }

    #[test]
    fn test_empty_blockquote_is_dropped() {
        let quote = Node::element("blockquote");
        let options = TurndownOptions::default();
        let quote = NodeRef::new(&quote);

        assert_eq!(rule("blockquote").replace(&quote, "  ", &options).unwrap(), "");
    }
}
