//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, the lookahead buffer, and the parse entry points.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser with a single token of lookahead:
//! - This module: Parser struct, lookahead handling, nesting guard
//! - `statements`: Parsing assignments, `if` statements and blocks
//! - `expressions`: Parsing arithmetic with term/factor decomposition
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Default bound on block and parenthesis nesting
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default bound on operator nesting within one expression tree
pub const DEFAULT_MAX_EXPRESSION_HEIGHT: usize = 1024;

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest allowed nesting of parenthesised expressions and blocks
    pub max_depth: usize,
    /// Most `BinaryOp` levels allowed between an expression root and a leaf.
    ///
    /// Operator chains fold into left-deep trees, so `1 + 1 + ... + 1` with
    /// `n` operators has height `n` even without any parentheses.
    pub max_expression_height: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_expression_height: DEFAULT_MAX_EXPRESSION_HEIGHT,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_expression_height(mut self, max_expression_height: usize) -> Self {
        self.max_expression_height = max_expression_height;
        self
    }
}

/// What a grammar procedure was looking for when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    /// Start of a factor: an integer literal or `(`
    Factor,
    /// Start of a statement: an identifier or `if`
    Statement,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(TokenKind::IntLiteral(_)) => write!(f, "integer"),
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Factor => write!(f, "integer or '('"),
            Expected::Statement => write!(f, "identifier or 'if'"),
        }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: Expected,
        found: TokenKind,
        position: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: Expected },

    #[error("nesting deeper than {limit} levels")]
    RecursionLimitExceeded { limit: usize, position: usize },

    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    /// True when the error points at a defect in the scanner or parser.
    pub fn is_internal(&self) -> bool {
        match self {
            ParseError::Lex(err) => err.is_internal(),
            _ => false,
        }
    }

    /// Byte offset the error refers to, if known.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { position, .. } => Some(*position),
            ParseError::RecursionLimitExceeded { position, .. } => Some(*position),
            ParseError::UnexpectedEndOfInput { .. } => None,
            ParseError::Lex(err) => err.position(),
        }
    }
}

/// Recursive descent parser with one token of lookahead
pub struct Parser<'src> {
    pub(crate) lexer: Lexer<'src>,
    pub(crate) lookahead: Token,
    pub(crate) depth: usize,
    pub(crate) config: ParserConfig,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: &'src str, config: ParserConfig) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let lookahead = lexer.next_token()?;
        Ok(Self {
            lexer,
            lookahead,
            depth: 0,
            config,
        })
    }

    pub fn source(&self) -> &'src str {
        self.lexer.source()
    }

    /// The pending token
    pub fn lookahead(&self) -> &Token {
        &self.lookahead
    }

    /// Parse the entire program (statements until end of input)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            program.statements.push(self.parse_statement()?);
        }

        debug!(statements = program.len(), "parsed program");
        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn is_at_end(&self) -> bool {
        self.lookahead.is_eof()
    }

    /// Whether the lookahead has the same kind as `kind`, ignoring literal values.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.lookahead.kind.same_kind(kind)
    }

    /// Consume the lookahead and fetch the next token, returning the old one.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    /// Consume the lookahead if it is `kind`; otherwise leave it in place.
    pub fn match_token(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(Expected::Token(*kind)))
        }
    }

    /// Build the error for a lookahead that does not fit `expected`.
    pub(crate) fn unexpected(&self, expected: Expected) -> ParseError {
        if self.is_at_end() {
            ParseError::UnexpectedEndOfInput { expected }
        } else {
            ParseError::UnexpectedToken {
                expected,
                found: self.lookahead.kind,
                position: self.lookahead.span.offset,
            }
        }
    }

    /// Run `f` one nesting level deeper, failing once the configured limit
    /// is passed.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.config.max_depth {
            return Err(ParseError::RecursionLimitExceeded {
                limit: self.config.max_depth,
                position: self.lookahead.span.offset,
            });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
