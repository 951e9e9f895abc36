//! Org-mode conversion rules.
//!
//! Every rule comes in two forms: a `*_rule` constructor returning the
//! [`Rule`], and a provider taking `&mut TurndownService` that registers it
//! under its name so providers can be handed to `use_plugins`.

use once_cell::sync::Lazy;
use regex::Regex;
use turndown::{clean_attribute, repeat, Filter, HeadingStyle, LinkStyle, NodeRef, Rule, TurndownService};

use crate::options::OrgModeOptions;
use crate::preformatted::pre_rule;

/// Opening line of a block with a `<pre><code>` source.
///
/// The spelling matches what existing consumers of this output expect.
pub const FENCED_SRC_BEGIN: &str = "#+BEGINE_SRC";
pub const SRC_BEGIN: &str = "#+BEGIN_SRC";
pub const SRC_END: &str = "#+END_SRC";
pub const EXAMPLE_BEGIN: &str = "#+BEGIN_EXAMPLE";
pub const EXAMPLE_END: &str = "#+END_EXAMPLE";

static CLASS_LANGUAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"language-(\S+)").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n|\r").unwrap());

pub fn heading(service: &mut TurndownService) {
    service.add_rule("heading", heading_rule());
}

pub fn inline_link(service: &mut TurndownService) {
    service.add_rule("inlineLink", inline_link_rule());
}

pub fn emphasis(service: &mut TurndownService) {
    service.add_rule("emphasis", emphasis_rule(&OrgModeOptions::default()));
}

pub fn strong(service: &mut TurndownService) {
    service.add_rule("strong", strong_rule(&OrgModeOptions::default()));
}

pub fn code_block(service: &mut TurndownService) {
    service.add_rule("codeBlock", code_block_rule());
}

pub fn code(service: &mut TurndownService) {
    service.add_rule("code", code_rule());
}

pub fn pre(service: &mut TurndownService) {
    service.add_rule("pre", pre_rule());
}

/// `* Title` headings, or underlined h1/h2 under setext style
pub fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, options| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

        if options.heading_style == HeadingStyle::Setext && level < 3 {
            let underline = if level == 1 { "=" } else { "-" };
            format!(
                "\n\n{}\n{}\n\n",
                content,
                repeat(underline, content.chars().count())
            )
        } else {
            format!("\n\n{} {}\n\n", repeat("*", level), content)
        }
    })
}

/// `[[href "title"][text]]` for anchors with an href, under inlined style
pub fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "a"
                && options.link_style == LinkStyle::Inlined
                && node.attr("href").is_some_and(|href| !href.is_empty())
        }),
        |node, content, _| {
            let href = node.attr("href").unwrap_or_default();
            let title = clean_attribute(node.attr("title"));
            let title = if title.is_empty() {
                title
            } else {
                format!(" \"{}\"", title)
            };

            format!("[[{}{}][{}]]", href, title, content)
        },
    )
}

pub fn emphasis_rule(options: &OrgModeOptions) -> Rule {
    delimited(&["em", "i"], options.em_delimiter.clone())
}

pub fn strong_rule(options: &OrgModeOptions) -> Rule {
    delimited(&["strong", "b"], options.strong_delimiter.clone())
}

/// Wrap non-blank content in `delimiter`; blank content disappears
fn delimited(tags: &[&str], delimiter: String) -> Rule {
    Rule::for_tags(tags, move |_, content, _| {
        if content.trim().is_empty() {
            return String::new();
        }
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

/// `<pre>` whose first child is `<code>`: a source block from the code text
pub fn code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "pre" && starts_with_code(node)),
        |node, _, _| {
            let Some(code) = node.first_child() else {
                return String::new();
            };
            let language = code
                .attr("class")
                .and_then(|class| CLASS_LANGUAGE.captures(class))
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str());

            source_block(FENCED_SRC_BEGIN, language, &code.text_content())
        },
    )
}

/// Any `<code>` that is not the only child of a `<pre>`.
///
/// Output is an example block even for inline spans.
pub fn code_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            let is_code_block = node.parent_tag().as_deref() == Some("pre") && !node.has_siblings();
            tag == "code" && !is_code_block
        }),
        |_, content, _| {
            if content.is_empty() {
                return String::new();
            }
            let content = LINE_BREAK.replace_all(content, " ");

            format!("{}\n{}\n{}", EXAMPLE_BEGIN, content, EXAMPLE_END)
        },
    )
}

/// True when the node's first child is a `<code>` element
pub(crate) fn starts_with_code(node: &NodeRef) -> bool {
    node.first_child().is_some_and(|child| child.is_tag("code"))
}

/// Source block envelope; one trailing newline of `body` is dropped
pub(crate) fn source_block(begin: &str, language: &str, body: &str) -> String {
    let body = body.strip_suffix('\n').unwrap_or(body);
    format!("\n\n{} {}\n{}\n{}\n\n", begin, language, body, SRC_END)
}
