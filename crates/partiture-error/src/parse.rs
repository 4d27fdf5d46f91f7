//! Parser Error Types
//!
//! Error types for the algebra parser, including source span tracking.

use std::fmt;
use thiserror::Error;

/// Byte range in the algebra text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both
    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// The text this span covers, if it lies inside `source`
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Errors produced while turning algebra text into a tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty algebra expression")]
    Empty,

    #[error("unknown symbol '{symbol}' at {span}")]
    UnknownSymbol { symbol: String, span: Span },

    #[error("unknown operator '{operator}' at {span}")]
    UnknownOperator { operator: String, span: Span },

    #[error("unbalanced grouping at {span}: {detail}")]
    UnbalancedGroup { detail: &'static str, span: Span },

    #[error("unexpected '{found}' at {span}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        span: Span,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Two different operators chained without parentheses
    #[error("ambiguous chain at {span}: '{first}' and '{second}' mixed without parentheses")]
    AmbiguousChain {
        first: String,
        second: String,
        span: Span,
    },

    #[error("invalid coefficient '{literal}' at {span}: {reason}")]
    InvalidCoefficient {
        literal: String,
        reason: &'static str,
        span: Span,
    },

    #[error("grouping nested deeper than {limit} levels at {span}")]
    NestingTooDeep { limit: usize, span: Span },

    #[error("more than {limit} nested relations at {span}")]
    TreeTooTall { limit: usize, span: Span },
}

impl ParseError {
    /// The offending piece of input, if the error points at one
    pub fn fragment(&self) -> Option<String> {
        match self {
            ParseError::Empty | ParseError::UnexpectedEnd { .. } => None,
            ParseError::UnknownSymbol { symbol, .. } => Some(symbol.clone()),
            ParseError::UnknownOperator { operator, .. } => Some(operator.clone()),
            ParseError::UnbalancedGroup { .. } => Some("(".to_string()),
            ParseError::UnexpectedToken { found, .. } => Some(found.clone()),
            ParseError::AmbiguousChain { first, second, .. } => {
                Some(format!("{} ... {}", first, second))
            }
            ParseError::InvalidCoefficient { literal, .. } => Some(literal.clone()),
            ParseError::NestingTooDeep { .. } => Some("(".to_string()),
            ParseError::TreeTooTall { limit, .. } => Some(format!("relation {}", limit + 1)),
        }
    }

    /// Source span of the error, if known
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Empty | ParseError::UnexpectedEnd { .. } => None,
            ParseError::UnknownSymbol { span, .. }
            | ParseError::UnknownOperator { span, .. }
            | ParseError::UnbalancedGroup { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::AmbiguousChain { span, .. }
            | ParseError::InvalidCoefficient { span, .. }
            | ParseError::NestingTooDeep { span, .. }
            | ParseError::TreeTooTall { span, .. } => Some(*span),
        }
    }
}
