//! Selector rules (one key/operator/values predicate).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LabelsError, Result};

use super::operator::{Arity, Operator};

/// A single selector predicate.
///
/// Rules can only be built through [`Rule::new`] (or the shorthand
/// constructors), which enforces the operator arity and keeps keys and values
/// free of the characters the selector grammar uses as delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct Rule {
    key: String,
    operator: Operator,
    values: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct RawRule {
    key: String,
    operator: Operator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<String>,
}

impl Rule {
    pub fn new<I, V>(key: impl Into<String>, operator: Operator, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into().trim().to_string();
        let values = values
            .into_iter()
            .map(|value| value.into().trim().to_string())
            .collect::<Vec<_>>();

        if key.is_empty() {
            return Err(LabelsError::InvalidRule("key must not be empty".to_string()));
        }
        if !is_selector_token(&key) {
            return Err(LabelsError::InvalidRule(format!(
                "key {key:?} contains reserved characters"
            )));
        }

        match operator.arity() {
            Arity::Unary if !values.is_empty() => {
                return Err(LabelsError::InvalidRule(format!(
                    "{operator} takes no values"
                )));
            }
            Arity::Single if values.len() != 1 => {
                return Err(LabelsError::InvalidRule(format!(
                    "{operator} takes exactly one value, got {}",
                    values.len()
                )));
            }
            Arity::Set if values.is_empty() => {
                return Err(LabelsError::InvalidRule(format!(
                    "{operator} takes at least one value"
                )));
            }
            _ => {}
        }

        if let Some(value) = values.iter().find(|value| !is_selector_token(value)) {
            return Err(LabelsError::InvalidRule(format!(
                "value {value:?} for key {key:?} is empty or contains reserved characters"
            )));
        }

        Ok(Self {
            key,
            operator,
            values,
        })
    }

    pub fn exists(key: impl Into<String>) -> Result<Self> {
        Self::new(key, Operator::Exists, Vec::<String>::new())
    }

    pub fn does_not_exist(key: impl Into<String>) -> Result<Self> {
        Self::new(key, Operator::DoesNotExist, Vec::<String>::new())
    }

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        Self::new(key, Operator::Equals, [value])
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        Self::new(key, Operator::NotEquals, [value])
    }

    pub fn is_in<I, V>(key: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(key, Operator::In, values)
    }

    pub fn not_in<I, V>(key: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(key, Operator::NotIn, values)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The single value of a binary rule (`=`, `!=`, `>`, `<`).
    pub fn value(&self) -> Option<&str> {
        match self.operator.arity() {
            Arity::Single => self.values.first().map(String::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
            operator => {
                // Every non-unary operator has a token.
                let token = operator.token().unwrap_or_default();
                match operator.arity() {
                    Arity::Set => write!(f, "{} {token} ({})", self.key, self.values.join(",")),
                    _ => write!(f, "{} {token} {}", self.key, self.values.join("")),
                }
            }
        }
    }
}

impl TryFrom<RawRule> for Rule {
    type Error = LabelsError;

    fn try_from(raw: RawRule) -> Result<Self> {
        Rule::new(raw.key, raw.operator, raw.values)
    }
}

impl From<Rule> for RawRule {
    fn from(rule: Rule) -> Self {
        Self {
            key: rule.key,
            operator: rule.operator,
            values: rule.values,
        }
    }
}

/// Characters that delimit keys and values in selector text.
pub(crate) fn is_reserved_char(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | ',' | '!' | '=' | '<' | '>')
}

/// Returns true if `raw` can be written as a single key or value token.
pub(crate) fn is_selector_token(raw: &str) -> bool {
    !raw.is_empty() && !raw.chars().any(is_reserved_char)
}
