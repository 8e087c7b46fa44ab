//! Rule evaluation against label sets.

use std::cmp::Ordering;

use crate::labels::LabelLookup;

use super::operator::Operator;
use super::rule::Rule;

/// Returns true if `labels` satisfies every rule. No rules match everything.
pub fn matches<L: LabelLookup + ?Sized>(rules: &[Rule], labels: &L) -> bool {
    rules.iter().all(|rule| rule_matches(rule, labels))
}

/// Evaluates a single rule.
///
/// `NotIn` also matches when the label is absent. `NotEquals` requires the
/// label to exist with a different value, the same way the store filters
/// results. `GreaterThan`/`LessThan` compare numerically when both sides are
/// numbers and lexically otherwise.
pub fn rule_matches<L: LabelLookup + ?Sized>(rule: &Rule, labels: &L) -> bool {
    let label = labels.label(rule.key());
    let values = rule.values();

    match rule.operator() {
        Operator::Exists => label.is_some(),
        Operator::DoesNotExist => label.is_none(),
        Operator::Equals => label.is_some_and(|label| values.iter().any(|v| v == label)),
        Operator::NotEquals => label.is_some_and(|label| values.iter().all(|v| v != label)),
        Operator::In => label.is_some_and(|label| values.iter().any(|v| v == label)),
        Operator::NotIn => label.map_or(true, |label| values.iter().all(|v| v != label)),
        Operator::GreaterThan => compare(label, rule.value()) == Some(Ordering::Greater),
        Operator::LessThan => compare(label, rule.value()) == Some(Ordering::Less),
    }
}

fn compare(label: Option<&str>, value: Option<&str>) -> Option<Ordering> {
    let (label, value) = (label?, value?);
    match (label.parse::<f64>(), value.parse::<f64>()) {
        (Ok(left), Ok(right)) => left.partial_cmp(&right),
        _ => Some(label.cmp(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Labels;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs.iter().copied().collect()
    }

    fn rule(key: &str, operator: Operator, values: &[&str]) -> Rule {
        Rule::new(key, operator, values.iter().copied()).expect("valid rule")
    }

    #[test]
    fn conjunction_of_in_and_exists() {
        let rules = vec![
            rule("env", Operator::In, &["prod", "staging"]),
            rule("tier", Operator::Exists, &[]),
        ];
        assert!(matches(&rules, &labels(&[("env", "prod"), ("tier", "web")])));
        assert!(!matches(&rules, &labels(&[("env", "dev"), ("tier", "web")])));
        assert!(!matches(&rules, &labels(&[("env", "prod")])));
    }

    #[test]
    fn empty_rules_match_everything() {
        assert!(matches(&[], &labels(&[])));
        assert!(matches(&[], &labels(&[("env", "prod")])));
    }

    #[test]
    fn not_in_matches_absent_key() {
        let rules = vec![rule("env", Operator::NotIn, &["prod"])];
        assert!(matches(&rules, &labels(&[])));
        assert!(matches(&rules, &labels(&[("env", "dev")])));
        assert!(!matches(&rules, &labels(&[("env", "prod")])));
    }

    #[test]
    fn does_not_exist() {
        let rules = vec![rule("draft", Operator::DoesNotExist, &[])];
        assert!(matches(&rules, &labels(&[("env", "prod")])));
        assert!(!matches(&rules, &labels(&[("draft", "")])));
    }

    #[test]
    fn equals_and_not_equals() {
        let equals = vec![rule("env", Operator::Equals, &["prod"])];
        assert!(matches(&equals, &labels(&[("env", "prod")])));
        assert!(!matches(&equals, &labels(&[("env", "dev")])));
        assert!(!matches(&equals, &labels(&[])));

        let not_equals = vec![rule("env", Operator::NotEquals, &["prod"])];
        assert!(matches(&not_equals, &labels(&[("env", "dev")])));
        assert!(!matches(&not_equals, &labels(&[("env", "prod")])));
        assert!(!matches(&not_equals, &labels(&[])));
    }

    #[test]
    fn ordering_is_numeric_for_numbers() {
        let greater = vec![rule("cpu", Operator::GreaterThan, &["4"])];
        assert!(matches(&greater, &labels(&[("cpu", "16")])));
        assert!(!matches(&greater, &labels(&[("cpu", "4")])));
        assert!(!matches(&greater, &labels(&[("cpu", "2.5")])));
        assert!(!matches(&greater, &labels(&[])));

        let less = vec![rule("cpu", Operator::LessThan, &["10"])];
        assert!(matches(&less, &labels(&[("cpu", "9")])));
        assert!(!matches(&less, &labels(&[("cpu", "10")])));
    }

    #[test]
    fn ordering_falls_back_to_lexical() {
        let greater = vec![rule("version", Operator::GreaterThan, &["v1.2"])];
        assert!(matches(&greater, &labels(&[("version", "v1.3")])));
        assert!(!matches(&greater, &labels(&[("version", "v1.10")])));
    }

    #[test]
    fn works_with_hash_maps() {
        let mut map = std::collections::HashMap::new();
        map.insert("env".to_string(), "prod".to_string());
        let rules = vec![rule("env", Operator::Equals, &["prod"])];
        assert!(matches(&rules, &map));
    }
}
