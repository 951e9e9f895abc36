//! TurndownService - the conversion host.
//!
//! The service walks a [`Node`] tree bottom-up. Each element's children are
//! converted first; the first rule whose filter matches then turns the node
//! and that content into an output fragment. Plugins register rules through
//! [`TurndownService::add_rule`] and [`TurndownService::use_plugins`].

use std::str::FromStr;

use serde::Deserialize;

use crate::node::{Node, NodeRef, NodeType};
use crate::rules::{Rule, Rules};
use crate::utilities::{collapse_whitespace, is_block, is_preformatted};
use crate::{Result, TurndownError};

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// Underline h1/h2 (`=` and `-`); deeper levels fall back to prefixes
    #[default]
    Setext,
    /// Always use a prefix run
    Atx,
}

impl FromStr for HeadingStyle {
    type Err = TurndownError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "setext" => Ok(HeadingStyle::Setext),
            "atx" => Ok(HeadingStyle::Atx),
            other => Err(TurndownError::InvalidInput(format!("unknown heading style: {other}"))),
        }
    }
}

/// Link style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// Links carry their target inline
    #[default]
    Inlined,
    /// Links point at a reference list
    Referenced,
}

impl FromStr for LinkStyle {
    type Err = TurndownError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "inlined" => Ok(LinkStyle::Inlined),
            "referenced" => Ok(LinkStyle::Referenced),
            other => Err(TurndownError::InvalidInput(format!("unknown link style: {other}"))),
        }
    }
}

/// Options handed to every rule filter and replacement
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TurndownOptions {
    /// Heading style (setext or atx)
    pub heading_style: HeadingStyle,

    /// Link style (inlined or referenced)
    pub link_style: LinkStyle,

    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,
}

impl Default for TurndownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            link_style: LinkStyle::Inlined,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
        }
    }
}

impl TurndownOptions {
    /// Load options from a JSON object such as `{"headingStyle": "atx"}`.
    /// Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TurndownError::InvalidInput(format!("invalid options: {e}")))
    }
}

/// Conversion state carried down the tree
#[derive(Debug, Default, Clone, Copy)]
struct Context {
    in_pre: bool,
}

/// The main conversion service
pub struct TurndownService {
    options: TurndownOptions,
    rules: Rules,
}

impl TurndownService {
    /// Create a new TurndownService with default options
    pub fn new() -> Self {
        Self::with_options(TurndownOptions::default())
    }

    /// Create a TurndownService with custom options
    pub fn with_options(options: TurndownOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Convert a DOM Node tree
    pub fn turndown(&self, node: &Node) -> Result<String> {
        let result = if node.is_element() {
            self.process_node(&NodeRef::new(node), Context::default())?
        } else {
            self.process_children(node, Context::default())?
        };

        Ok(post_process(&result))
    }

    /// Parse an HTML string and convert it
    #[cfg(feature = "html")]
    pub fn turndown_html(&self, html: &str) -> Result<String> {
        let node = crate::html::parse_html(html);
        self.turndown(&node)
    }

    /// Add a named rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        tracing::debug!(rule = key, "registering rule");
        self.rules.add(key, rule);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Apply several plugins in order
    pub fn use_plugins<I, F>(&mut self, plugins: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(&mut Self),
    {
        for plugin in plugins {
            plugin(self);
        }
        self
    }

    /// The registered rules
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Get the current options
    pub fn options(&self) -> &TurndownOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut TurndownOptions {
        &mut self.options
    }

    /// Convert every child of `parent` and concatenate the results
    fn process_children(&self, parent: &Node, ctx: Context) -> Result<String> {
        let mut result = String::new();

        for index in 0..parent.children().count() {
            let Some(child) = NodeRef::child_of(parent, index) else {
                break;
            };
            result.push_str(&self.process_node(&child, ctx)?);
        }

        Ok(result)
    }

    /// Convert a single node
    fn process_node(&self, node: &NodeRef, ctx: Context) -> Result<String> {
        match node.node.node_type {
            NodeType::Text => {
                let text = node.node.node_value.as_deref().unwrap_or("");
                Ok(if ctx.in_pre {
                    text.to_string()
                } else {
                    collapse_whitespace(text)
                })
            }
            NodeType::Element => {
                let tag = node.tag_name();
                let child_ctx = Context {
                    in_pre: ctx.in_pre || is_preformatted(&tag),
                };
                let content = self.process_children(node.node, child_ctx)?;

                match self.rules.for_node(node, &self.options) {
                    Some((name, rule)) => {
                        tracing::trace!(rule = name, tag = %tag, "rule matched");
                        rule.replace(node, &content, &self.options)
                    }
                    None if is_block(&tag) => Ok(format!("\n\n{}\n\n", content)),
                    None => Ok(content),
                }
            }
            NodeType::Document | NodeType::DocumentFragment => {
                self.process_children(node.node, ctx)
            }
            NodeType::Comment => Ok(String::new()),
        }
    }
}

impl Default for TurndownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim surrounding newlines and cap newline runs at two
fn post_process(output: &str) -> String {
    let result = output.trim_matches('\n');

    let mut newline_count = 0;
    let mut processed = String::with_capacity(result.len());

    for c in result.chars() {
        if c == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                processed.push(c);
            }
        } else {
            newline_count = 0;
            processed.push(c);
        }
    }

    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Filter;

    fn make_p(text: &str) -> Node {
        Node::element("p").with_child(Node::text(text))
    }

    #[test]
    fn test_simple_paragraph() {
        let service = TurndownService::new();
        let result = service.turndown(&make_p("Hello   World")).unwrap();
        assert_eq!(result, "Hello World");
    }

    #[test]
    fn test_unmatched_inline_passes_content() {
        let service = TurndownService::new();
        let span = Node::element("span").with_child(Node::text("plain"));
        assert_eq!(service.turndown(&span).unwrap(), "plain");
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let service = TurndownService::new();
        let mut fragment = Node::document_fragment();
        fragment.add_child(make_p("One"));
        fragment.add_child(make_p("Two"));
        assert_eq!(service.turndown(&fragment).unwrap(), "One\n\nTwo");
    }

    #[test]
    fn test_whitespace_kept_inside_pre() {
        let mut service = TurndownService::new();
        service.add_rule("echo", Rule::for_tag("pre", |_, content, _| content.to_string()));
        let pre = Node::element("pre").with_child(Node::text("a\n  b"));
        assert_eq!(service.turndown(&pre).unwrap(), "a\n  b");
    }

    #[test]
    fn test_ordered_list() {
        let service = TurndownService::new();
        let ol = Node::element("ol")
            .with_child(Node::element("li").with_child(Node::text("One")))
            .with_child(Node::element("li").with_child(Node::text("Two")));
        let result = service.turndown(&ol).unwrap();
        assert!(result.contains("1.  One"));
        assert!(result.contains("2.  Two"));
    }

    #[test]
    fn test_plugins_run_in_order() {
        fn upper(service: &mut TurndownService) {
            service.add_rule("upper", Rule::for_tag("b", |_, c, _| c.to_uppercase()));
        }
        fn lower(service: &mut TurndownService) {
            service.add_rule("lower", Rule::for_tag("b", |_, c, _| c.to_lowercase()));
        }

        let mut service = TurndownService::new();
        service.use_plugins([upper as fn(&mut TurndownService), lower]);
        assert_eq!(service.rules().names().collect::<Vec<_>>(), vec!["upper", "lower"]);

        let b = Node::element("b").with_child(Node::text("MiXed"));
        assert_eq!(service.turndown(&b).unwrap(), "MIXED");
    }

    #[test]
    fn test_rule_errors_propagate() {
        let mut service = TurndownService::new();
        service.add_rule(
            "broken",
            Rule::fallible(Filter::tag("span"), |_, _, _| {
                Err(TurndownError::ConversionError("boom".into()))
            }),
        );
        let p = Node::element("p").with_child(Node::element("span"));
        assert!(matches!(service.turndown(&p), Err(TurndownError::ConversionError(_))));
    }

    #[test]
    fn test_options_from_json() {
        let options = TurndownOptions::from_json(r#"{"headingStyle": "atx", "linkStyle": "referenced"}"#).unwrap();
        assert_eq!(options.heading_style, HeadingStyle::Atx);
        assert_eq!(options.link_style, LinkStyle::Referenced);
        assert_eq!(options.hr, "* * *");

        assert!(TurndownOptions::from_json(r#"{"headingStyle": "fancy"}"#).is_err());
    }

    #[test]
    fn test_styles_from_str() {
        assert_eq!("SETEXT".parse::<HeadingStyle>().unwrap(), HeadingStyle::Setext);
        assert_eq!("inlined".parse::<LinkStyle>().unwrap(), LinkStyle::Inlined);
        assert!("other".parse::<LinkStyle>().is_err());
    }
}
