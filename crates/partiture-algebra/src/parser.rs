//! # Algebra Parser
//!
//! Turns a line of cognitive algebra into an [`AlgebraTree`].
//!
//! ```text
//! expr    := operand (op operand)*
//! operand := [number] atom
//! atom    := SYMBOL | "(" expr ")"
//! ```
//!
//! All operators share one precedence level. Repeating the same operator is
//! left-associative (`A ~ B ~ C` is `(A ~ B) ~ C`); mixing different operators
//! in one unparenthesised chain is rejected as ambiguous. A number before a
//! symbol is that leaf's mass; a number before a group is the group's
//! acceleration.
//!
//! Trees are bounded: at most [`MAX_TREE_HEIGHT`] relations on any root-to-leaf
//! path, and the product of group accelerations along a path stays within
//! [`MAX_ACCELERATION`] of one in either direction.

use partiture_error::{ParseError, Span};
use partiture_types::{RelationOperator, SymbolTable};
use tracing::debug;

use crate::ast::{AlgebraNode, AlgebraTree};
use crate::lexer::{tokenize, SpannedToken, Token};

/// Deepest grouping the parser accepts
pub const MAX_NESTING_DEPTH: usize = 64;

/// Most relations on any root-to-leaf path
pub const MAX_TREE_HEIGHT: usize = 128;

/// Bound on the cumulative acceleration of a group and on its reciprocal
pub const MAX_ACCELERATION: f64 = 1e12;

/// Parse algebra text into a tree
pub fn parse(input: &str) -> Result<AlgebraTree, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser::new(&tokens);
    let (root, _) = parser.parse_expr(0, 1.0)?;

    if let Some(extra) = parser.peek() {
        return Err(match extra.token {
            Token::RParen => ParseError::UnbalancedGroup {
                detail: "unexpected ')'",
                span: extra.span,
            },
            _ => ParseError::UnexpectedToken {
                found: extra.token.text(),
                expected: "end of input",
                span: extra.span,
            },
        });
    }

    let tree = AlgebraTree::new(input, root);
    debug!(
        nodes = tree.node_count(),
        leaves = tree.root().leaf_count(),
        "parsed algebra expression"
    );
    Ok(tree)
}

/// Cursor over the token stream
struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [SpannedToken]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Parse an operator chain, stopping before ')' or end of input.
    /// Returns the node with its relation height.
    fn parse_expr(&mut self, depth: usize, rate: f64) -> Result<(AlgebraNode, usize), ParseError> {
        let (mut node, mut height) = self.parse_operand(depth, rate)?;
        let mut chain: Option<(RelationOperator, Span)> = None;

        while let Some(next) = self.peek() {
            let op = match next.token {
                Token::Operator(op) => op,
                Token::RParen => break,
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        found: next.token.text(),
                        expected: "an operator or ')'",
                        span: next.span,
                    })
                }
            };

            if let Some((first, first_span)) = chain {
                if first != op {
                    return Err(ParseError::AmbiguousChain {
                        first: first.token().to_string(),
                        second: op.token().to_string(),
                        span: first_span.join(next.span),
                    });
                }
            }

            self.advance();
            let (right, right_height) = self.parse_operand(depth, rate)?;
            height = height.max(right_height) + 1;
            if height > MAX_TREE_HEIGHT {
                return Err(ParseError::TreeTooTall {
                    limit: MAX_TREE_HEIGHT,
                    span: next.span,
                });
            }
            node = AlgebraNode::relation(op, node, right);
            chain = Some((op, next.span));
        }

        Ok((node, height))
    }

    /// Parse an optionally coefficient-prefixed symbol or group
    fn parse_operand(&mut self, depth: usize, rate: f64) -> Result<(AlgebraNode, usize), ParseError> {
        let coefficient = match self.peek() {
            Some(SpannedToken {
                token: Token::Number(literal),
                span,
            }) => {
                self.advance();
                Some((parse_coefficient(literal, *span)?, *span, literal.as_str()))
            }
            _ => None,
        };

        let Some(next) = self.advance() else {
            return Err(ParseError::UnexpectedEnd {
                expected: if coefficient.is_some() {
                    "a symbol or group after the coefficient"
                } else {
                    "a symbol or group"
                },
            });
        };

        match &next.token {
            Token::Word(word) => {
                let entry = SymbolTable::global().lookup(word).ok_or_else(|| {
                    ParseError::UnknownSymbol {
                        symbol: word.clone(),
                        span: next.span,
                    }
                })?;
                let (mass, span) = match coefficient {
                    Some((mass, number_span, _)) => (mass, number_span.join(next.span)),
                    None => (1.0, next.span),
                };
                Ok((AlgebraNode::leaf(entry.symbol, mass, span), 0))
            }
            Token::LParen => {
                if depth + 1 > MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        limit: MAX_NESTING_DEPTH,
                        span: next.span,
                    });
                }

                let rate = match coefficient {
                    Some((acceleration, number_span, literal)) => {
                        scaled_rate(rate, acceleration, literal, number_span)?
                    }
                    None => rate,
                };

                let (mut inner, height) = self.parse_expr(depth + 1, rate)?;
                match self.advance() {
                    Some(SpannedToken {
                        token: Token::RParen,
                        span,
                    }) => {
                        let start = coefficient.map(|(_, s, _)| s).unwrap_or(next.span);
                        inner.span = start.join(*span);
                    }
                    _ => {
                        return Err(ParseError::UnbalancedGroup {
                            detail: "missing ')'",
                            span: next.span,
                        })
                    }
                }

                if let Some((acceleration, _, _)) = coefficient {
                    inner.acceleration *= acceleration;
                }
                Ok((inner, height))
            }
            Token::RParen => Err(ParseError::UnbalancedGroup {
                detail: "unexpected ')'",
                span: next.span,
            }),
            Token::Operator(_) | Token::Number(_) => Err(ParseError::UnexpectedToken {
                found: next.token.text(),
                expected: "a symbol or group",
                span: next.span,
            }),
        }
    }
}

/// Fold a group acceleration into the rate of its enclosing groups
fn scaled_rate(rate: f64, acceleration: f64, literal: &str, span: Span) -> Result<f64, ParseError> {
    let scaled = rate * acceleration;
    if (1.0 / MAX_ACCELERATION..=MAX_ACCELERATION).contains(&scaled) {
        return Ok(scaled);
    }
    Err(ParseError::InvalidCoefficient {
        literal: literal.to_string(),
        reason: "cumulative acceleration out of range",
        span,
    })
}

fn parse_coefficient(literal: &str, span: Span) -> Result<f64, ParseError> {
    let value: f64 = literal.parse().map_err(|_| ParseError::InvalidCoefficient {
        literal: literal.to_string(),
        reason: "not a number",
        span,
    })?;

    if !value.is_finite() || value <= 0.0 {
        return Err(ParseError::InvalidCoefficient {
            literal: literal.to_string(),
            reason: "coefficients must be positive",
            span,
        });
    }
    Ok(value)
}
