//! Tokenizer for the boolean expression grammar.

use super::Operator;
use crate::types::EvaluationError;
use std::fmt;

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Op(Operator),
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => f.write_str(name),
            Self::Op(op) => f.write_str(op.keyword()),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
        }
    }
}

/// A token together with its byte offset in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Split an expression into tokens.
///
/// Identifiers are ASCII `[A-Za-z_][A-Za-z0-9_]*`. The seven operator
/// keywords are reserved. Anything else is rejected, which is what keeps
/// natural-language text (punctuation, digits-first words) out of the
/// evaluator.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EvaluationError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let simple = match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = simple {
            chars.next();
            tokens.push(Token { kind, position });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let mut end = position;
            while let Some(&(i, ch)) = chars.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    end = i + ch.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &source[position..end];
            let kind = match Operator::from_keyword(word) {
                Some(op) => TokenKind::Op(op),
                None => TokenKind::Ident(word.to_string()),
            };
            tokens.push(Token { kind, position });
            continue;
        }

        return Err(EvaluationError::UnexpectedCharacter { position, found: c });
    }

    Ok(tokens)
}
