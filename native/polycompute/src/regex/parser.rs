//! Regular expression parser: tokens, implicit concatenation, postfix order.
//!
//! Grammar: one-character literal symbols, `|`,
//! juxtaposition, postfix `*`, parentheses and the epsilon literal `ε`.

use crate::automaton::{Alphabet, EPSILON, is_epsilon};
use crate::error::{Error, Result};
use std::fmt;

/// A lexical token of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A literal symbol, possibly the epsilon literal.
    Symbol(String),
    Union,
    Concat,
    Star,
    LParen,
    RParen,
}

impl Token {
    /// Binding strength of a binary or postfix operator.
    fn precedence(&self) -> u8 {
        match self {
            Token::Union => 1,
            Token::Concat => 2,
            Token::Star => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Symbol(s) => f.write_str(s),
            Token::Union => f.write_str("|"),
            Token::Concat => f.write_str("."),
            Token::Star => f.write_str("*"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// A token together with the character position it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Split a pattern into tokens. The empty pattern is the epsilon literal.
pub fn tokenize(pattern: &str) -> Vec<Spanned> {
    if pattern.is_empty() {
        return vec![Spanned {
            token: Token::Symbol(EPSILON.to_string()),
            position: 0,
        }];
    }

    pattern
        .chars()
        .enumerate()
        .map(|(position, c)| {
            let token = match c {
                '|' => Token::Union,
                '*' => Token::Star,
                '(' => Token::LParen,
                ')' => Token::RParen,
                other => Token::Symbol(other.to_string()),
            };
            Spanned { token, position }
        })
        .collect()
}

/// Insert `Concat` wherever two operands are juxtaposed.
///
/// A concatenation follows every token except `(` and `|`, unless the next
/// token is `)`, `|` or `*`.
pub fn insert_concatenation(tokens: Vec<Spanned>) -> Vec<Spanned> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    let mut iter = tokens.into_iter().peekable();

    while let Some(current) = iter.next() {
        let joins_left = !matches!(current.token, Token::LParen | Token::Union);
        let position = current.position;
        out.push(current);

        if let Some(next) = iter.peek() {
            let joins_right = !matches!(next.token, Token::RParen | Token::Union | Token::Star);
            if joins_left && joins_right {
                out.push(Spanned {
                    token: Token::Concat,
                    position: position + 1,
                });
            }
        }
    }

    out
}

/// Shunting-yard conversion from explicit-concatenation infix to postfix.
pub fn to_postfix(infix: Vec<Spanned>) -> Result<Vec<Spanned>> {
    let mut output = Vec::with_capacity(infix.len());
    let mut operators: Vec<Spanned> = Vec::new();

    for item in infix {
        match item.token {
            Token::Symbol(_) => output.push(item),
            Token::LParen => operators.push(item),
            Token::RParen => loop {
                match operators.pop() {
                    Some(Spanned {
                        token: Token::LParen,
                        ..
                    }) => break,
                    Some(op) => output.push(op),
                    None => {
                        return Err(Error::malformed(item.position, "unmatched `)`"));
                    }
                }
            },
            Token::Union | Token::Concat | Token::Star => {
                let precedence = item.token.precedence();
                while operators.last().is_some_and(|top| {
                    top.token != Token::LParen && top.token.precedence() >= precedence
                }) {
                    if let Some(top) = operators.pop() {
                        output.push(top);
                    }
                }
                operators.push(item);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op.token == Token::LParen {
            return Err(Error::malformed(op.position, "unmatched `(`"));
        }
        output.push(op);
    }

    Ok(output)
}

/// Parse a pattern into postfix tokens.
pub fn parse(pattern: &str) -> Result<Vec<Spanned>> {
    let postfix = to_postfix(insert_concatenation(tokenize(pattern)))?;
    if !postfix.iter().any(|s| matches!(s.token, Token::Symbol(_))) {
        return Err(Error::malformed(0, "pattern has no operand"));
    }
    Ok(postfix)
}

/// Render postfix tokens as text, e.g. `ab|*` for `(a|b)*`.
pub fn postfix_string(tokens: &[Spanned]) -> String {
    tokens.iter().map(|s| s.token.to_string()).collect()
}

/// Reject patterns using literal symbols outside `alphabet`. Epsilon is always allowed.
pub fn check_symbols(pattern: &str, alphabet: &Alphabet) -> Result<()> {
    for spanned in tokenize(pattern) {
        if let Token::Symbol(symbol) = &spanned.token {
            if !is_epsilon(symbol) && !alphabet.contains(symbol) {
                return Err(Error::malformed(
                    spanned.position,
                    format!("symbol `{symbol}` is not in the alphabet"),
                ));
            }
        }
    }
    Ok(())
}
