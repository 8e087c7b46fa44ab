//! Label selector parsing, serialization, and matching.
//!
//! This module provides the selector language used to filter labeled
//! resources:
//! - Operator and rule types (`Exists`, `In`, `=`, ...)
//! - Selector parsing with comma-in-parentheses aware fragment splitting
//! - Canonical serialization (the left inverse of parsing)
//! - Matching against label sets (rules are ANDed)

mod label_selector;
mod matcher;
mod operator;
mod parser;
mod rule;

use std::fmt;
use std::str::FromStr;

use crate::error::{LabelsError, Result};
use crate::labels::LabelLookup;

// Re-export public types
pub use label_selector::LabelSelector;
pub use matcher::{matches, rule_matches};
pub use operator::{Arity, Operator};
pub use parser::{parse_expression, parse_selector};
pub use rule::Rule;

/// Serializes rules into canonical selector text, joined by `,`.
pub fn stringify(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(Rule::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// An ordered, conjunctive list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    rules: Vec<Rule>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(selector: &str) -> Result<Self> {
        Ok(Self {
            rules: parse_selector(selector)?,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Appends a rule. Existing rules for the same key are kept.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Replaces every rule for `rule.key()` with `rule`.
    ///
    /// The new rule takes the position of the first replaced rule, or is
    /// appended if the key had no rules.
    pub fn replace_rules_for_key(&mut self, rule: Rule) {
        let position = self.rules.iter().position(|r| r.key() == rule.key());
        self.rules.retain(|r| r.key() != rule.key());
        match position {
            Some(index) => self.rules.insert(index, rule),
            None => self.rules.push(rule),
        }
    }

    /// Removes every rule for `key`, returning how many were removed.
    pub fn remove_rules_for_key(&mut self, key: &str) -> usize {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.key() != key);
        before - self.rules.len()
    }

    pub fn matches<L: LabelLookup + ?Sized>(&self, labels: &L) -> bool {
        matches(&self.rules, labels)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(&self.rules))
    }
}

impl FromStr for Selector {
    type Err = LabelsError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw)
    }
}

impl From<Vec<Rule>> for Selector {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl TryFrom<&LabelSelector> for Selector {
    type Error = LabelsError;

    fn try_from(selector: &LabelSelector) -> Result<Self> {
        Ok(Self {
            rules: selector.to_rules()?,
        })
    }
}

impl FromIterator<Rule> for Selector {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Selector {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selector {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
