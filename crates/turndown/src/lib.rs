//! # turndown
//!
//! Rule-driven conversion of DOM trees into lightweight markup.
//!
//! This is a Rust implementation inspired by [turndown](https://github.com/mixmark-io/turndown).
//! The service owns the traversal; output syntax comes from rules. A small
//! set of base rules covers paragraphs, lists and the like, and plugins add
//! named rules on top that are consulted first.
//!
//! ## Design
//!
//! The library accepts a CDP-style DOM [`Node`] structure, so any HTML parser
//! can feed it. Rules see a [`NodeRef`], which knows its parent and siblings.
//! Rules that need browser-rendered text use a [`RenderContext`].
//!
//! ## Example
//!
//! ```rust
//! use turndown::{Node, Rule, TurndownService};
//!
//! let mut service = TurndownService::new();
//! service.add_rule("strong", Rule::for_tags(&["strong", "b"], |_, content, _| {
//!     format!("*{}*", content)
//! }));
//!
//! let strong = Node::element("strong").with_child(Node::text("Hello"));
//! assert_eq!(service.turndown(&strong).unwrap(), "*Hello*");
//! ```

#[cfg(feature = "html")]
pub mod html;
pub mod node;
pub mod render;
mod rules;
mod service;
mod utilities;

#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Node, NodeRef, NodeType};
pub use render::{Attached, RenderContext, RenderError};
pub use rules::{Filter, PredicateFn, ReplacementFn, Rule, Rules};
pub use service::{HeadingStyle, LinkStyle, TurndownOptions, TurndownService};
pub use utilities::*;

/// Error type for turndown operations
#[derive(Debug, thiserror::Error)]
pub enum TurndownError {
    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, TurndownError>;
