//! Source text to syntax tree
//!
//! This module transforms parsnip source text into an Abstract Syntax Tree (AST):
//! - [`scanner`]: Character cursor with lexeme marks and save/restore backtracking
//! - [`lexer`]: Tokenization (characters → tokens)
//! - [`parse`]: Parser driver, lookahead buffer and error types
//! - [`ast`]: AST node definitions
//!
//! # Language
//!
//! ```text
//! x = 2 + 3 * 4
//! if (7 - 1) / 2 {
//!     y = 1
//! } else {
//!     y = 0
//! }
//! ```
//!
//! Expressions are unsigned integer arithmetic over `+ - * /` with
//! parentheses. Keywords (`if`, `else`, `return`) are case-insensitive.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with one token of lookahead. The expression
//! grammar uses the term/factor decomposition, folding each loop to the left.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod scanner;
mod statements;

#[cfg(test)]
mod property_tests;
