//! Rule registry.
//!
//! Rules are looked up first-match-wins: named rules added through
//! [`Rules::add`] in insertion order, then the host's base rules. When nothing
//! matches the caller falls back to its default handling.

mod base;
mod rule;

pub use base::base_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::service::TurndownOptions;

/// Collection of rules for conversion
pub struct Rules {
    /// Rules added by plugins or the user (checked first)
    custom_rules: IndexMap<String, Rule>,
    /// Host defaults
    base_rules: Vec<(&'static str, Rule)>,
}

impl Rules {
    /// Create a new Rules instance holding only the base rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            base_rules: base_rules(),
        }
    }

    /// Add a named rule. Re-adding a name replaces the rule in place.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Look up a named rule added with [`Rules::add`]
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.custom_rules.get(key)
    }

    /// Names of the added rules, in lookup order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.custom_rules.keys().map(String::as_str)
    }

    /// Find the first rule matching a node, with its name
    pub fn for_node<'a>(
        &'a self,
        node: &NodeRef,
        options: &TurndownOptions,
    ) -> Option<(&'a str, &'a Rule)> {
        let custom = self
            .custom_rules
            .iter()
            .map(|(name, rule)| (name.as_str(), rule));
        let base = self.base_rules.iter().map(|(name, rule)| (*name, rule));

        custom
            .chain(base)
            .find(|(_, rule)| rule.matches(node, options))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
