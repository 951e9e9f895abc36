//! # turndown-orgmode
//!
//! Org-mode rules for the [`turndown`] conversion service.
//!
//! The plugin registers seven rules: headings, inline links, emphasis, strong
//! emphasis, `<pre><code>` source blocks, other `<code>` spans, and `<pre>`
//! blocks without a leading `<code>`. Elements without a rule here fall
//! through to the service's own handling.
//!
//! ## Example
//!
//! ```rust
//! use turndown::{HeadingStyle, Node, TurndownOptions, TurndownService};
//!
//! let mut service = TurndownService::with_options(TurndownOptions {
//!     heading_style: HeadingStyle::Atx,
//!     ..Default::default()
//! });
//! service.use_plugin(turndown_orgmode::orgmode);
//!
//! let h2 = Node::element("h2").with_child(Node::text("Setup"));
//! assert_eq!(service.turndown(&h2).unwrap(), "** Setup");
//! ```
//!
//! ## Known quirks
//!
//! `<pre><code>` blocks open with `#+BEGINE_SRC`, and inline `<code>` becomes
//! an `#+BEGIN_EXAMPLE` block. Both match the output existing consumers
//! were built against.

mod options;
mod preformatted;
mod rules;

pub use options::OrgModeOptions;
pub use preformatted::{convert_pre, language_from_id, pre_rule, restore_line_breaks, BR_PLACEHOLDER};
pub use rules::{
    code, code_block, code_block_rule, code_rule, emphasis, emphasis_rule, heading, heading_rule,
    inline_link, inline_link_rule, pre, strong, strong_rule, EXAMPLE_BEGIN, EXAMPLE_END,
    FENCED_SRC_BEGIN, SRC_BEGIN, SRC_END,
};

use turndown::TurndownService;

/// A rule provider, as accepted by [`TurndownService::use_plugins`]
pub type Provider = fn(&mut TurndownService);

/// The individual providers, in registration order
pub const PROVIDERS: [Provider; 7] = [heading, inline_link, emphasis, strong, code_block, code, pre];

/// Register every Org-mode rule with default delimiters
pub fn orgmode(service: &mut TurndownService) {
    service.use_plugins(PROVIDERS);
}

/// The Org-mode plugin with explicit settings
#[derive(Debug, Clone, Default)]
pub struct OrgMode {
    options: OrgModeOptions,
}

impl OrgMode {
    pub fn new(options: OrgModeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OrgModeOptions {
        &self.options
    }

    /// Register every Org-mode rule, using these settings for the delimiters
    pub fn register(&self, service: &mut TurndownService) {
        orgmode(service);
        service
            .add_rule("emphasis", emphasis_rule(&self.options))
            .add_rule("strong", strong_rule(&self.options));
    }
}
