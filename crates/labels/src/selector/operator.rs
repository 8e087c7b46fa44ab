//! Selector operators and their wire tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LabelsError, Result};

/// A selector operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Exists,
    DoesNotExist,
    Equals,
    NotEquals,
    In,
    NotIn,
    GreaterThan,
    LessThan,
}

/// How many values a rule with a given operator carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No values (`key`, `!key`).
    Unary,
    /// Exactly one value (`key = v`).
    Single,
    /// One or more values (`key in (a,b)`).
    Set,
}

/// Wire tokens for binary and set operators. The first token listed for an
/// operator is the canonical one used when serializing.
const OPERATOR_TOKENS: &[(&str, Operator)] = &[
    ("=", Operator::Equals),
    ("==", Operator::Equals),
    ("!=", Operator::NotEquals),
    (">", Operator::GreaterThan),
    ("<", Operator::LessThan),
    ("in", Operator::In),
    ("notin", Operator::NotIn),
];

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Exists,
        Operator::DoesNotExist,
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::NotIn,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    /// Looks up the operator for a wire token (`=`, `!=`, `in`, ...).
    pub fn from_token(token: &str) -> Option<Self> {
        OPERATOR_TOKENS
            .iter()
            .find(|(candidate, _)| *candidate == token)
            .map(|(_, operator)| *operator)
    }

    /// Returns the canonical wire token. Unary operators have none: they are
    /// written as `key` / `!key`.
    pub fn token(self) -> Option<&'static str> {
        OPERATOR_TOKENS
            .iter()
            .find(|(_, operator)| *operator == self)
            .map(|(token, _)| *token)
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::Exists | Self::DoesNotExist => Arity::Unary,
            Self::Equals | Self::NotEquals | Self::GreaterThan | Self::LessThan => Arity::Single,
            Self::In | Self::NotIn => Arity::Set,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Exists => "Exists",
            Self::DoesNotExist => "DoesNotExist",
            Self::Equals => "Equals",
            Self::NotEquals => "NotEquals",
            Self::In => "In",
            Self::NotIn => "NotIn",
            Self::GreaterThan => "GreaterThan",
            Self::LessThan => "LessThan",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses either an operator name (`NotIn`) or a wire token (`notin`).
impl FromStr for Operator {
    type Err = LabelsError;

    fn from_str(raw: &str) -> Result<Self> {
        if let Some(operator) = Self::ALL.iter().find(|op| op.name() == raw) {
            return Ok(*operator);
        }
        Self::from_token(raw)
            .ok_or_else(|| LabelsError::InvalidRule(format!("unknown operator: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_map_both_ways() {
        for operator in Operator::ALL {
            match operator.token() {
                Some(token) => assert_eq!(Operator::from_token(token), Some(operator)),
                None => assert_eq!(operator.arity(), Arity::Unary),
            }
        }
    }

    #[test]
    fn double_equals_is_an_alias() {
        assert_eq!(Operator::from_token("=="), Some(Operator::Equals));
        assert_eq!(Operator::Equals.token(), Some("="));
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(Operator::from_token("~"), None);
        assert_eq!(Operator::from_token("IN"), None);
        assert!("~".parse::<Operator>().is_err());
    }

    #[test]
    fn from_str_accepts_names_and_tokens() {
        assert_eq!("NotIn".parse::<Operator>().expect("name"), Operator::NotIn);
        assert_eq!("notin".parse::<Operator>().expect("token"), Operator::NotIn);
        assert_eq!(">".parse::<Operator>().expect("token"), Operator::GreaterThan);
    }
}
