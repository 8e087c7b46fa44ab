//! Structured selector with equality labels split from expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LabelsError, Result};
use crate::labels::{LabelLookup, Labels};

use super::matcher::matches;
use super::operator::Operator;
use super::parser::parse_selector;
use super::rule::{is_selector_token, Rule};

/// A label selector in its structured form: plain `key = value` requirements
/// in `match_labels`, everything else in `match_expressions`.
///
/// Deserialized label entries are checked the same way [`Rule`] keys and
/// values are, so a deserialized selector always renders to parseable text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLabelSelector")]
pub struct LabelSelector {
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub match_labels: Labels,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_expressions: Vec<Rule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLabelSelector {
    #[serde(default)]
    match_labels: Labels,
    #[serde(default)]
    match_expressions: Vec<Rule>,
}

impl LabelSelector {
    pub fn parse(selector: &str) -> Result<Self> {
        Ok(Self::from_rules(parse_selector(selector)?))
    }

    /// Splits rules into the structured form. An equality rule moves into
    /// `match_labels` unless its key is already there, in which case it stays
    /// an expression so no requirement is lost.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut selector = Self::default();
        for rule in rules {
            let label = match (rule.operator(), rule.value()) {
                (Operator::Equals, Some(value)) if !selector.match_labels.has(rule.key()) => {
                    Some((rule.key().to_string(), value.to_string()))
                }
                _ => None,
            };
            match label {
                Some((key, value)) => {
                    selector.match_labels.insert(key, value);
                }
                None => selector.match_expressions.push(rule),
            }
        }
        selector
    }

    /// Expands the selector into a flat rule list: label requirements first
    /// (ordered by key), then expressions in their original order.
    pub fn to_rules(&self) -> Result<Vec<Rule>> {
        let mut rules = self
            .match_labels
            .iter()
            .map(|(key, value)| Rule::equals(key.as_str(), value.as_str()))
            .collect::<Result<Vec<_>>>()?;
        rules.extend(self.match_expressions.iter().cloned());
        Ok(rules)
    }

    pub fn matches<L: LabelLookup + ?Sized>(&self, labels: &L) -> bool {
        self.match_labels
            .iter()
            .all(|(key, value)| labels.label(key) == Some(value.as_str()))
            && matches(&self.match_expressions, labels)
    }

    pub fn is_empty(&self) -> bool {
        self.match_labels.is_empty() && self.match_expressions.is_empty()
    }

    /// Checks that every `match_labels` entry is a plain selector token.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in &self.match_labels {
            if !is_selector_token(key) {
                return Err(LabelsError::InvalidRule(format!(
                    "label key {key:?} is empty or contains reserved characters"
                )));
            }
            if !is_selector_token(value) {
                return Err(LabelsError::InvalidRule(format!(
                    "value {value:?} for label {key:?} is empty or contains reserved characters"
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<RawLabelSelector> for LabelSelector {
    type Error = LabelsError;

    fn try_from(raw: RawLabelSelector) -> Result<Self> {
        let selector = Self {
            match_labels: raw.match_labels,
            match_expressions: raw.match_expressions,
        };
        selector.validate()?;
        Ok(selector)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self
            .match_labels
            .iter()
            .map(|(key, value)| format!("{key} = {value}"));
        let expressions = self.match_expressions.iter().map(Rule::to_string);
        let parts = labels.chain(expressions).collect::<Vec<_>>();
        f.write_str(&parts.join(","))
    }
}

impl From<Vec<Rule>> for LabelSelector {
    fn from(rules: Vec<Rule>) -> Self {
        Self::from_rules(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::stringify;

    #[test]
    fn parse_splits_equality_from_expressions() {
        let selector = LabelSelector::parse("labelA = a, labelB != b").expect("parse");
        assert_eq!(selector.match_labels.get("labelA"), "a");
        assert_eq!(selector.match_labels.len(), 1);
        assert_eq!(
            selector.match_expressions,
            vec![Rule::not_equals("labelB", "b").expect("valid rule")]
        );
    }

    #[test]
    fn duplicate_equality_keeps_both_requirements() {
        let selector = LabelSelector::parse("env = prod, env = dev").expect("parse");
        assert_eq!(selector.match_labels.get("env"), "prod");
        assert_eq!(
            selector.match_expressions,
            vec![Rule::equals("env", "dev").expect("valid rule")]
        );
        assert_eq!(selector.to_string(), "env = prod,env = dev");
    }

    #[test]
    fn display_lists_labels_before_expressions() {
        let selector = LabelSelector::parse("!draft, tier = web, env = prod").expect("parse");
        assert_eq!(selector.to_string(), "env = prod,tier = web,!draft");
    }

    #[test]
    fn to_rules_round_trips_through_text() {
        let selector = LabelSelector::parse("env = prod, tier in (web,api)").expect("parse");
        let rules = selector.to_rules().expect("rules");
        assert_eq!(stringify(&rules), selector.to_string());
        assert_eq!(LabelSelector::from_rules(rules), selector);
    }

    #[test]
    fn matches_labels_and_expressions() {
        let selector = LabelSelector::parse("env = prod, tier notin (db)").expect("parse");
        let web: Labels = [("env", "prod"), ("tier", "web")].into_iter().collect();
        let db: Labels = [("env", "prod"), ("tier", "db")].into_iter().collect();
        let dev: Labels = [("env", "dev")].into_iter().collect();
        assert!(selector.matches(&web));
        assert!(!selector.matches(&db));
        assert!(!selector.matches(&dev));
        assert!(LabelSelector::default().matches(&dev));
    }

    #[test]
    fn serde_uses_camel_case_fields() {
        let selector = LabelSelector::parse("env = prod, !draft").expect("parse");
        let json = serde_json::to_value(&selector).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "matchLabels": { "env": "prod" },
                "matchExpressions": [{ "key": "draft", "operator": "DoesNotExist" }],
            })
        );

        let back: LabelSelector = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, selector);

        let empty = serde_json::to_string(&LabelSelector::default()).expect("serialize");
        assert_eq!(empty, "{}");
    }

    #[test]
    fn deserialization_rejects_reserved_characters() {
        let spaced = serde_json::from_str::<LabelSelector>(r#"{"matchLabels":{"a b":"x"}}"#);
        assert!(spaced.is_err());
        let listed = serde_json::from_str::<LabelSelector>(r#"{"matchLabels":{"a":"x,y"}}"#);
        assert!(listed.is_err());
        let both = serde_json::from_str::<LabelSelector>(r#"{"matchLabels":{"a b":"x,y"}}"#);
        assert!(both.is_err());
        let empty = serde_json::from_str::<LabelSelector>(r#"{"matchLabels":{"a":""}}"#);
        assert!(empty.is_err());
    }

    #[test]
    fn deserialized_selector_renders_parseable_text() {
        let selector: LabelSelector = serde_json::from_str(
            r#"{"matchLabels":{"urth/scenario.name":"nightly"},"matchExpressions":[{"key":"tier","operator":"In","values":["web","api"]}]}"#,
        )
        .expect("deserialize");
        let text = selector.to_string();
        assert_eq!(text, "urth/scenario.name = nightly,tier in (web,api)");
        assert_eq!(LabelSelector::parse(&text).expect("parse"), selector);
        assert!(selector.to_rules().is_ok());
    }

    #[test]
    fn validate_catches_direct_edits() {
        let mut selector = LabelSelector::parse("env = prod").expect("parse");
        assert!(selector.validate().is_ok());
        selector.match_labels.insert("team name", "sre");
        assert!(matches!(
            selector.validate(),
            Err(LabelsError::InvalidRule(_))
        ));
    }
}
