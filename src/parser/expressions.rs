//! Expression parsing implementation
//!
//! The grammar is written without left recursion. Precedence comes from the
//! term/factor split and associativity from folding each loop to the left:
//!
//! ```text
//! expression ::= term (('+' | '-') term)*
//! term       ::= factor (('*' | '/') factor)*
//! factor     ::= INT | '(' expression ')'
//! ```
//!
//! So `1 - 2 - 3` becomes `(1 - 2) - 3` and `1 + 2 * 3` becomes `1 + (2 * 3)`.
//!
//! Folding makes a chain of `n` operators a tree of height `n`, so every fold
//! is checked against `ParserConfig::max_expression_height`.
//!
//! All parsing methods are implemented as methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Expected, ParseError, Parser};

/// An expression together with its height in `BinaryOp` levels (0 for a literal).
struct Measured {
    expr: Expression,
    height: usize,
}

impl Parser<'_> {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        Ok(self.parse_sum()?.expr)
    }

    /// Parse sum (+ -)
    fn parse_sum(&mut self) -> Result<Measured, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let position = self.lookahead.span.offset;
            let op = if self.match_token(&TokenKind::Plus)? {
                BinOp::Add
            } else if self.match_token(&TokenKind::Minus)? {
                BinOp::Sub
            } else {
                break;
            };

            let right = self.parse_term()?;
            left = self.fold(op, left, right, position)?;
        }

        Ok(left)
    }

    /// Parse term (* /)
    fn parse_term(&mut self) -> Result<Measured, ParseError> {
        let mut left = self.parse_factor()?;

        loop {
            let position = self.lookahead.span.offset;
            let op = if self.match_token(&TokenKind::Star)? {
                BinOp::Mul
            } else if self.match_token(&TokenKind::Slash)? {
                BinOp::Div
            } else {
                break;
            };

            let right = self.parse_factor()?;
            left = self.fold(op, left, right, position)?;
        }

        Ok(left)
    }

    /// Parse factor (integer literal or parenthesized expression)
    fn parse_factor(&mut self) -> Result<Measured, ParseError> {
        if let TokenKind::IntLiteral(value) = self.lookahead.kind {
            self.advance()?;
            return Ok(Measured {
                expr: Expression::IntLiteral(value),
                height: 0,
            });
        }

        if self.check(&TokenKind::OpenParen) {
            return self.nested(|p| {
                p.advance()?;
                let inner = p.parse_sum()?;
                p.expect(&TokenKind::CloseParen)?;
                Ok(inner)
            });
        }

        Err(self.unexpected(Expected::Factor))
    }

    /// Combine two operands, refusing trees taller than the configured height.
    ///
    /// `position` is the byte offset of the operator.
    fn fold(
        &self,
        op: BinOp,
        left: Measured,
        right: Measured,
        position: usize,
    ) -> Result<Measured, ParseError> {
        let height = left.height.max(right.height) + 1;
        if height > self.config.max_expression_height {
            return Err(ParseError::RecursionLimitExceeded {
                limit: self.config.max_expression_height,
                position,
            });
        }

        Ok(Measured {
            expr: Expression::binary(op, left.expr, right.expr),
            height,
        })
    }
}
