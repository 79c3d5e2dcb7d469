//! Recursive-descent parser producing an [`Expr`] tree.
//!
//! Precedence, loosest first:
//! `implication` (right associative), `or`/`nor`, `xor`, `and`/`nand`, `not`.
//! Every binary operator may also be written in call form, `xor(A, B)`.

use super::lexer::{Token, TokenKind, tokenize};
use super::{BinaryOp, Expr, Operator};
use crate::primitives::{MAX_EXPRESSION_DEPTH, MAX_EXPRESSION_LENGTH};
use crate::types::EvaluationError;

/// Parse expression text into an AST.
pub fn parse(source: &str) -> Result<Expr, EvaluationError> {
    if source.len() > MAX_EXPRESSION_LENGTH {
        return Err(EvaluationError::TooLong {
            max: MAX_EXPRESSION_LENGTH,
        });
    }
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(EvaluationError::Empty);
    }

    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.implication()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(unexpected(token, "end of expression")),
    }
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

fn unexpected(token: &Token, expected: &'static str) -> EvaluationError {
    EvaluationError::UnexpectedToken {
        position: token.position,
        found: token.kind.to_string(),
        expected,
    }
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn next_token(&mut self) -> Result<Token, EvaluationError> {
        let token = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or(EvaluationError::UnexpectedEnd)?;
        self.cursor += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), EvaluationError> {
        let token = self.next_token()?;
        if &token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(&token, expected))
        }
    }

    /// Consume the next token if it is one of `ops`.
    fn eat_binary(&mut self, ops: &[Operator]) -> Option<BinaryOp> {
        let op = match self.peek_kind() {
            Some(TokenKind::Op(op)) if ops.contains(op) => *op,
            _ => return None,
        };
        // A binary keyword directly followed by '(' in infix position is
        // still infix: `A and (B)`.
        self.cursor += 1;
        op.binary()
    }

    fn enter(&mut self) -> Result<(), EvaluationError> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(EvaluationError::TooDeep {
                max: MAX_EXPRESSION_DEPTH,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn implication(&mut self) -> Result<Expr, EvaluationError> {
        self.enter()?;
        let lhs = self.or_level()?;
        let expr = if self.eat_binary(&[Operator::Implication]).is_some() {
            let rhs = self.implication()?;
            Expr::binary(BinaryOp::Implication, lhs, rhs)
        } else {
            lhs
        };
        self.leave();
        Ok(expr)
    }

    fn or_level(&mut self) -> Result<Expr, EvaluationError> {
        let mut lhs = self.xor_level()?;
        while let Some(op) = self.eat_binary(&[Operator::Or, Operator::Nor]) {
            let rhs = self.xor_level()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn xor_level(&mut self) -> Result<Expr, EvaluationError> {
        let mut lhs = self.and_level()?;
        while let Some(op) = self.eat_binary(&[Operator::Xor]) {
            let rhs = self.and_level()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_level(&mut self) -> Result<Expr, EvaluationError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.eat_binary(&[Operator::And, Operator::Nand]) {
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, EvaluationError> {
        if matches!(self.peek_kind(), Some(TokenKind::Op(Operator::Not))) {
            self.cursor += 1;
            self.enter()?;
            let operand = self.unary()?;
            self.leave();
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, EvaluationError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Ident(name) => {
                if matches!(self.peek_kind(), Some(TokenKind::LParen)) {
                    return Err(EvaluationError::NotCallable(name));
                }
                Ok(Expr::Var(name))
            }
            TokenKind::LParen => {
                let inner = self.implication()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Op(op) => {
                if !matches!(self.peek_kind(), Some(TokenKind::LParen)) {
                    return Err(EvaluationError::UnexpectedToken {
                        position: token.position,
                        found: op.keyword().to_string(),
                        expected: "operand",
                    });
                }
                self.call(op)
            }
            TokenKind::RParen | TokenKind::Comma => Err(unexpected(&token, "operand")),
        }
    }

    /// Parse `op(arg, arg)`; the operator token is already consumed.
    fn call(&mut self, op: Operator) -> Result<Expr, EvaluationError> {
        self.expect(&TokenKind::LParen, "'('")?;
        let mut args = vec![self.implication()?];
        while matches!(self.peek_kind(), Some(TokenKind::Comma)) {
            self.cursor += 1;
            args.push(self.implication()?);
        }
        self.expect(&TokenKind::RParen, "')'")?;

        let expected = op.arity();
        if args.len() != expected {
            return Err(EvaluationError::Arity {
                operator: op.keyword(),
                expected,
                found: args.len(),
            });
        }

        let mut args = args.into_iter();
        match (op.binary(), args.next(), args.next()) {
            (None, Some(operand), None) => Ok(Expr::Not(Box::new(operand))),
            (Some(bin), Some(lhs), Some(rhs)) => Ok(Expr::binary(bin, lhs, rhs)),
            _ => Err(EvaluationError::Arity {
                operator: op.keyword(),
                expected,
                found: 0,
            }),
        }
    }
}
