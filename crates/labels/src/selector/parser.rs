//! Selector parser and tokenizer.

use crate::error::{LabelsError, Result};

use super::operator::{Arity, Operator};
use super::rule::{is_reserved_char, Rule};

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ExpressionToken {
    kind: ExpressionTokenKind,
    position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExpressionTokenKind {
    Word(String),
    /// `=`, `==`, `!=`, `>` or `<`.
    Symbol(&'static str),
    Bang,
    LParen,
    RParen,
    Comma,
}

impl ExpressionTokenKind {
    fn describe(&self) -> String {
        match self {
            Self::Word(word) => format!("{word:?}"),
            Self::Symbol(symbol) => format!("'{symbol}'"),
            Self::Bang => "'!'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Comma => "','".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Parses a full selector (`a in (x,y), b = 1, !c`) into its rules.
///
/// Fragments are split on commas outside parentheses and parsed in order.
/// The parse is all-or-nothing: the first malformed fragment fails the whole
/// selector. A blank selector has no rules.
pub fn parse_selector(selector: &str) -> Result<Vec<Rule>> {
    if selector.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rules = split_fragments(selector)?
        .into_iter()
        .map(parse_expression)
        .collect::<Result<Vec<_>>>()?;
    log::debug!("parsed selector {selector:?} into {} rule(s)", rules.len());
    Ok(rules)
}

/// Parses a single selector fragment (`key`, `!key`, `key = v`, `key in (a,b)`).
pub fn parse_expression(expression: &str) -> Result<Rule> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(LabelsError::parse(expression, "empty expression"));
    }

    let tokens = tokenize_expression(trimmed);
    let mut parser = ExpressionParser {
        source: trimmed,
        tokens,
        index: 0,
    };
    let rule = parser.parse_rule()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error(format!(
            "unexpected {} near byte {}",
            token.kind.describe(),
            token.position
        )));
    }
    Ok(rule)
}

// ---------------------------------------------------------------------------
// Fragment splitting
// ---------------------------------------------------------------------------

/// Splits selector text on top-level commas. Commas inside `(...)` belong to
/// a value list and never split.
fn split_fragments(selector: &str) -> Result<Vec<&str>> {
    let mut fragments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (index, ch) in selector.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    LabelsError::parse(selector, format!("unexpected ')' near byte {index}"))
                })?;
            }
            ',' if depth == 0 => {
                fragments.push(non_empty_fragment(selector, start, index)?);
                start = index + 1;
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(LabelsError::parse(selector, "missing closing ')'"));
    }
    fragments.push(non_empty_fragment(selector, start, selector.len())?);
    Ok(fragments)
}

fn non_empty_fragment(selector: &str, start: usize, end: usize) -> Result<&str> {
    let fragment = selector[start..end].trim();
    if fragment.is_empty() {
        return Err(LabelsError::parse(
            selector,
            format!("empty expression near byte {start}"),
        ));
    }
    Ok(fragment)
}

// ---------------------------------------------------------------------------
// Expression parser
// ---------------------------------------------------------------------------

struct ExpressionParser<'a> {
    source: &'a str,
    tokens: Vec<ExpressionToken>,
    index: usize,
}

impl ExpressionParser<'_> {
    fn parse_rule(&mut self) -> Result<Rule> {
        if self.consume(&ExpressionTokenKind::Bang) {
            let key = self.expect_word("label key after '!'")?;
            return self.build(key, Operator::DoesNotExist, Vec::new());
        }

        let key = self.expect_word("label key")?;
        let Some(token) = self.next() else {
            return self.build(key, Operator::Exists, Vec::new());
        };

        let operator = match &token.kind {
            ExpressionTokenKind::Symbol(symbol) => Operator::from_token(symbol),
            ExpressionTokenKind::Word(word) => Operator::from_token(word),
            _ => None,
        }
        .ok_or_else(|| {
            self.error(format!(
                "unknown operator {} near byte {}",
                token.kind.describe(),
                token.position
            ))
        })?;

        let values = match operator.arity() {
            Arity::Set => self.parse_value_list()?,
            _ => vec![self.expect_word("value")?],
        };
        self.build(key, operator, values)
    }

    fn parse_value_list(&mut self) -> Result<Vec<String>> {
        if !self.consume(&ExpressionTokenKind::LParen) {
            return Err(self.error("expected '(' to open the value list"));
        }
        if self.consume(&ExpressionTokenKind::RParen) {
            return Err(self.error("value list must not be empty"));
        }

        let mut values = vec![self.expect_word("value")?];
        loop {
            if self.consume(&ExpressionTokenKind::RParen) {
                return Ok(values);
            }
            if !self.consume(&ExpressionTokenKind::Comma) {
                return Err(self.error("expected ',' or ')' in the value list"));
            }
            values.push(self.expect_word("value")?);
        }
    }

    fn build(&self, key: String, operator: Operator, values: Vec<String>) -> Result<Rule> {
        Rule::new(key, operator, values).map_err(|error| self.error(error.to_string()))
    }

    fn expect_word(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some(ExpressionToken {
                kind: ExpressionTokenKind::Word(word),
                ..
            }) => Ok(word),
            Some(token) => Err(self.error(format!(
                "expected {what} but found {} near byte {}",
                token.kind.describe(),
                token.position
            ))),
            None => Err(self.error(format!("expected {what} but reached end of expression"))),
        }
    }

    fn consume(&mut self, kind: &ExpressionTokenKind) -> bool {
        matches!(self.peek(), Some(token) if &token.kind == kind) && {
            self.index += 1;
            true
        }
    }

    fn peek(&self) -> Option<&ExpressionToken> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<ExpressionToken> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    fn error(&self, reason: impl Into<String>) -> LabelsError {
        LabelsError::parse(self.source, reason)
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

fn tokenize_expression(input: &str) -> Vec<ExpressionToken> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }

        let kind = match ch {
            '(' => ExpressionTokenKind::LParen,
            ')' => ExpressionTokenKind::RParen,
            ',' => ExpressionTokenKind::Comma,
            '>' => ExpressionTokenKind::Symbol(">"),
            '<' => ExpressionTokenKind::Symbol("<"),
            '=' => {
                if chars.next_if(|(_, next)| *next == '=').is_some() {
                    ExpressionTokenKind::Symbol("==")
                } else {
                    ExpressionTokenKind::Symbol("=")
                }
            }
            '!' => {
                if chars.next_if(|(_, next)| *next == '=').is_some() {
                    ExpressionTokenKind::Symbol("!=")
                } else {
                    ExpressionTokenKind::Bang
                }
            }
            _ => {
                let mut end = position + ch.len_utf8();
                while let Some((index, next)) = chars.next_if(|(_, next)| !is_reserved_char(*next))
                {
                    end = index + next.len_utf8();
                }
                ExpressionTokenKind::Word(input[position..end].to_string())
            }
        };
        tokens.push(ExpressionToken { kind, position });
    }

    tokens
}
