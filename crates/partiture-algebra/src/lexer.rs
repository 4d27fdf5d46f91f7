//! Lexer for the cognitive algebra
//!
//! Converts algebra text into tokens while preserving byte spans. Whitespace is
//! insignificant everywhere.

//-----------------------------------------------------------------------------
// Token Definition
//-----------------------------------------------------------------------------

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, char, digit1},
    combinator::{map, opt, recognize, value},
    sequence::pair,
    IResult,
};
use partiture_error::{ParseError, Span};
use partiture_types::RelationOperator;

/// Token types for the algebra parser
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Alphabetic word; a symbol if it is in the vocabulary
    Word(String),

    /// Numeric coefficient, kept as written
    Number(String),

    /// Relation operator
    Operator(RelationOperator),

    /// Left parenthesis '('
    LParen,

    /// Right parenthesis ')'
    RParen,
}

impl Token {
    /// Text of the token as it would be written
    pub fn text(&self) -> String {
        match self {
            Token::Word(word) => word.clone(),
            Token::Number(number) => number.clone(),
            Token::Operator(op) => op.token().to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// A token with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

//-----------------------------------------------------------------------------
// Token Recognizers
//-----------------------------------------------------------------------------

fn operator(input: &str) -> IResult<&str, RelationOperator> {
    alt((
        value(RelationOperator::Compound, alt((tag("->"), tag("→")))),
        value(RelationOperator::Tension, tag("~")),
        value(RelationOperator::Switch, tag("|")),
    ))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alpha1,
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        map(operator, Token::Operator),
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
        map(number, |text: &str| Token::Number(text.to_string())),
        map(word, |text: &str| match RelationOperator::from_token(text) {
            Some(op) => Token::Operator(op),
            None => Token::Word(text.to_string()),
        }),
    ))(input)
}

/// Run of punctuation that no recognizer accepted
fn unknown_run(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !c.is_alphanumeric() && c != '(' && c != ')')(input)
}

//-----------------------------------------------------------------------------
// Lexer Entry Point
//-----------------------------------------------------------------------------

/// Tokenize algebra text
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        let start = input.len() - rest.len();

        match token(rest) {
            Ok((remaining, token)) => {
                let end = input.len() - remaining.len();
                tokens.push(SpannedToken {
                    token,
                    span: Span::new(start, end),
                });
                rest = remaining.trim_start();
            }
            Err(_) => {
                let operator = match unknown_run(rest) {
                    Ok((_, run)) => run.to_string(),
                    Err(_) => rest.chars().next().map(String::from).unwrap_or_default(),
                };
                let end = start + operator.len();
                return Err(ParseError::UnknownOperator {
                    operator,
                    span: Span::new(start, end),
                });
            }
        }
    }

    Ok(tokens)
}
