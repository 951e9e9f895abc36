//! Rule and Filter types for HTML conversion.

use crate::node::NodeRef;
use crate::service::TurndownOptions;
use crate::Result;

/// Type alias for replacement functions
pub type ReplacementFn =
    Box<dyn Fn(&NodeRef, &str, &TurndownOptions) -> Result<String> + Send + Sync>;

/// Type alias for filter predicates
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef, &TurndownOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef, &TurndownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node. Only elements ever match.
    pub fn matches(&self, tag: &str, node: &NodeRef, options: &TurndownOptions) -> bool {
        if !node.is_element() {
            return false;
        }
        let tag_lower = tag.to_lowercase();
        match self {
            Filter::TagName(t) => tag_lower == *t,
            Filter::TagNames(tags) => tags.contains(&tag_lower),
            Filter::Predicate(f) => f(&tag_lower, node, options),
        }
    }
}

/// A rule pairs a filter with the replacement that renders matched elements
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function that generates the output fragment
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule whose replacement cannot fail
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::fallible(filter, move |node, content, options| {
            Ok(replacement(node, content, options))
        })
    }

    /// Create a rule whose replacement may fail; errors abort the conversion
    pub fn fallible<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Check whether this rule applies to `node`
    pub fn matches(&self, node: &NodeRef, options: &TurndownOptions) -> bool {
        self.filter.matches(&node.tag_name(), node, options)
    }

    /// Apply this rule's replacement
    pub fn replace(&self, node: &NodeRef, content: &str, options: &TurndownOptions) -> Result<String> {
        (self.replacement)(node, content, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_tag_filters_ignore_case() {
        let options = TurndownOptions::default();
        let node = Node::element("EM");
        let node = NodeRef::new(&node);

        assert!(Filter::tag("em").matches("EM", &node, &options));
        assert!(Filter::tags(&["I", "em"]).matches("em", &node, &options));
        assert!(!Filter::tag("strong").matches("em", &node, &options));
    }

    #[test]
    fn test_text_nodes_never_match() {
        let options = TurndownOptions::default();
        let text = Node::text("em");
        let text = NodeRef::new(&text);

        assert!(!Filter::predicate(|_, _, _| true).matches("#text", &text, &options));
    }

    #[test]
    fn test_replace_passes_content() {
        let options = TurndownOptions::default();
        let rule = Rule::for_tag("span", |_, content, _| format!("<{}>", content));
        let node = Node::element("span");
        let node = NodeRef::new(&node);

        assert!(rule.matches(&node, &options));
        assert_eq!(rule.replace(&node, "x", &options).unwrap(), "<x>");
    }
}
