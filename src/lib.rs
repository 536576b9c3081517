//! # Introduction
//!
//! parsnip is the front end for a small statement language: a backtracking
//! character scanner feeding a tokenizer, and a recursive-descent parser that
//! turns the tokens into an abstract syntax tree. A terminal inspector built
//! with [ratatui](https://docs.rs/ratatui) lets you step through the tokens
//! of a source file next to its parse tree.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → Lexer → Parser (one-token lookahead) → AST
//! ```
//!
//! 1. [`parser::scanner`]: character cursor with lexeme marks and a stack of
//!    saved positions for backtracking.
//! 2. [`parser::lexer`]: classifies characters into tokens that reference the
//!    source through spans.
//! 3. [`parser::parse`]: recursive descent over the tokens; errors are
//!    returned, never fatal.
//! 4. [`parser::ast`]: the owned syntax tree handed back to the caller.
//! 5. [`ui`]: ratatui-based inspector; not part of the stable library API.
//!
//! ## Quick start
//!
//! ```
//! let program = parsnip::parse("x = 2 + 3 * 4").unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

pub mod parser;
pub mod ui;

use parser::ast::{Expression, Program};
use parser::lexer::TokenKind;
use parser::parse::{ParseError, Parser};

/// Parse a whole program.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

/// Parse a single expression that must span the entire input.
pub fn parse_expression(source: &str) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(source)?;
    let expr = parser.parse_expression()?;
    parser.expect(&TokenKind::EndOfInput)?;
    Ok(expr)
}
