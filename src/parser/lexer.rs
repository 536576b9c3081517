//! Lexer (tokenizer) for parsnip source text
//!
//! Pulls characters from a [`Scanner`] and classifies them into [`Token`]s.
//! Tokens carry a [`Span`] into the source instead of a copy of their text.
//! Whitespace is skipped; there are no comments in the language.
//!
//! Lookahead is done with [`Lexer::peek_token`], which saves the scanner,
//! scans one token and restores, so peeking never consumes input no matter
//! how many characters the token spans.

use super::scanner::{Scanner, Span};
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// Reserved words. Matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Return,
    If,
    Else,
}

impl Keyword {
    const TABLE: [(&'static str, Keyword); 3] = [
        ("return", Keyword::Return),
        ("if", Keyword::If),
        ("else", Keyword::Else),
    ];

    /// Look up a complete identifier lexeme in the keyword table.
    pub fn lookup(lexeme: &str) -> Option<Keyword> {
        Self::TABLE
            .iter()
            .find(|(word, _)| word.eq_ignore_ascii_case(lexeme))
            .map(|(_, kw)| *kw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Return => "return",
            Keyword::If => "if",
            Keyword::Else => "else",
        }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    IntLiteral(u32),

    // Names
    Identifier,
    Keyword(Keyword),

    // Operators
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Equals, // =

    // Punctuation
    OpenParen,  // (
    CloseParen, // )
    OpenBrace,  // {
    CloseBrace, // }

    EndOfInput,
}

impl TokenKind {
    /// Single-character punctuation and operators.
    fn from_punct(ch: char) -> Option<TokenKind> {
        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => TokenKind::Equals,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            _ => return None,
        };
        Some(kind)
    }

    /// Kind equality that ignores the value of integer literals.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        match (self, other) {
            (TokenKind::IntLiteral(_), TokenKind::IntLiteral(_)) => true,
            _ => self == other,
        }
    }

    /// Short upper-case tag used by the token dump.
    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::IntLiteral(_) => "INT",
            TokenKind::Identifier => "IDENT",
            TokenKind::Keyword(Keyword::Return) => "RETURN",
            TokenKind::Keyword(Keyword::If) => "IF",
            TokenKind::Keyword(Keyword::Else) => "ELSE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Equals => "EQUALS",
            TokenKind::OpenParen => "OPEN_PAREN",
            TokenKind::CloseParen => "CLOSE_PAREN",
            TokenKind::OpenBrace => "OPEN_BRACE",
            TokenKind::CloseBrace => "CLOSE_BRACE",
            TokenKind::EndOfInput => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLiteral(n) => write!(f, "integer literal {}", n),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw.as_str()),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::OpenParen => write!(f, "'('"),
            TokenKind::CloseParen => write!(f, "')'"),
            TokenKind::OpenBrace => write!(f, "'{{'"),
            TokenKind::CloseBrace => write!(f, "'}}'"),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A classified lexeme.
///
/// The span is empty only for [`TokenKind::EndOfInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn lexeme<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

/// Lexer error type
///
/// `EmptyLexeme` and `UnbalancedRestore` are internal errors: they mean the
/// scanner was driven incorrectly, never that the input was bad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("integer literal does not fit in 32 bits")]
    IntegerOverflow { span: Span },

    #[error("attempted to close an empty lexeme")]
    EmptyLexeme,

    #[error("scanner restore without a matching save")]
    UnbalancedRestore,
}

impl LexError {
    /// True for scanner misuse, false for errors caused by the input.
    pub fn is_internal(&self) -> bool {
        matches!(self, LexError::EmptyLexeme | LexError::UnbalancedRestore)
    }

    /// Byte offset the error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            LexError::UnexpectedCharacter { position, .. } => Some(*position),
            LexError::IntegerOverflow { span } => Some(span.offset),
            LexError::EmptyLexeme | LexError::UnbalancedRestore => None,
        }
    }
}

/// Tokenizer over a single source string
pub struct Lexer<'src> {
    scanner: Scanner<'src>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            scanner: Scanner::new(source),
        }
    }

    pub fn source(&self) -> &'src str {
        self.scanner.source()
    }

    /// Byte offset the next scan starts from.
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Tokenize the entire input, ending with `EndOfInput`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            tokens.push(token);
            if token.is_eof() {
                break;
            }
        }

        Ok(tokens)
    }

    /// Return the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Token, LexError> {
        self.scanner.save();
        let result = self.next_token();
        self.scanner.restore()?;
        result
    }

    /// Scan and consume the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let Some(ch) = self.scanner.peek() else {
            let at = self.scanner.position();
            return Ok(Token::new(TokenKind::EndOfInput, Span::new(at, 0)));
        };

        let token = if ch.is_ascii_digit() {
            self.int_literal()?
        } else if ch.is_ascii_alphabetic() {
            self.identifier_or_keyword()?
        } else if let Some(kind) = TokenKind::from_punct(ch) {
            self.scanner.advance();
            Token::new(kind, self.close_lexeme()?)
        } else {
            return Err(LexError::UnexpectedCharacter {
                ch,
                position: self.scanner.position(),
            });
        };

        trace!(kind = ?token.kind, offset = token.span.offset, "token");
        Ok(token)
    }

    /// Skip whitespace, leaving the mark on the first significant character.
    fn skip_whitespace(&mut self) {
        self.scanner.mark();
        while let Some(' ' | '\t' | '\n' | '\r') = self.scanner.peek() {
            self.scanner.advance();
            self.scanner.mark();
        }
    }

    fn close_lexeme(&self) -> Result<Span, LexError> {
        self.scanner.end_mark().ok_or(LexError::EmptyLexeme)
    }

    /// Scan a maximal run of decimal digits
    fn int_literal(&mut self) -> Result<Token, LexError> {
        let mut value: Option<u32> = Some(0);

        while let Some(ch) = self.scanner.peek() {
            let Some(digit) = ch.to_digit(10) else {
                break;
            };
            self.scanner.advance();
            value = value
                .and_then(|v| v.checked_mul(10))
                .and_then(|v| v.checked_add(digit));
        }

        let span = self.close_lexeme()?;
        let value = value.ok_or(LexError::IntegerOverflow { span })?;

        Ok(Token::new(TokenKind::IntLiteral(value), span))
    }

    /// Scan a maximal run of letters and digits, then check the keyword table
    fn identifier_or_keyword(&mut self) -> Result<Token, LexError> {
        while let Some(ch) = self.scanner.peek() {
            if !ch.is_ascii_alphanumeric() {
                break;
            }
            self.scanner.advance();
        }

        let span = self.close_lexeme()?;
        let kind = match Keyword::lookup(span.text(self.scanner.source())) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier,
        };

        Ok(Token::new(kind, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_single_int_literal_spans_input() {
        let tokens = Lexer::new("123").tokenize().unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::IntLiteral(123));
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].kind, TokenKind::EndOfInput);
        assert!(tokens[1].span.is_empty());
    }

    #[test]
    fn test_keyword_requires_full_identifier() {
        let source = "if iff";
        let tokens = Lexer::new(source).tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::If));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme(source), "iff");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("IF Else rEtUrN"),
            vec![
                TokenKind::Keyword(Keyword::If),
                TokenKind::Keyword(Keyword::Else),
                TokenKind::Keyword(Keyword::Return),
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("+-*/=(){}"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Equals,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::OpenBrace,
                TokenKind::CloseBrace,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_demo_line() {
        let source = "123 if hello + return ) ";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme(source)).collect();

        assert_eq!(lexemes, vec!["123", "if", "hello", "+", "return", ")", ""]);
        assert_eq!(tokens[6].span.offset, source.len());
    }

    #[test]
    fn test_identifier_with_digits() {
        let source = "x1y2 3z";
        let tokens = Lexer::new(source).tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme(source), "x1y2");
        assert_eq!(tokens[1].kind, TokenKind::IntLiteral(3));
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].lexeme(source), "z");
    }

    #[test]
    fn test_leading_zero_literal() {
        assert_eq!(
            kinds("007"),
            vec![TokenKind::IntLiteral(7), TokenKind::EndOfInput]
        );
    }

    #[test]
    fn test_integer_limits() {
        assert_eq!(kinds("4294967295")[0], TokenKind::IntLiteral(u32::MAX));

        let err = Lexer::new("  4294967296").tokenize().unwrap_err();
        assert_eq!(
            err,
            LexError::IntegerOverflow {
                span: Span::new(2, 10)
            }
        );
        assert!(!err.is_internal());
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a = 1;").tokenize().unwrap_err();

        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                ch: ';',
                position: 5
            }
        );
        assert_eq!(err.to_string(), "unexpected character ';'");
    }

    #[test]
    fn test_whitespace_only_is_end_of_input() {
        let tokens = Lexer::new(" \t\r\n ").tokenize().unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::EndOfInput);
        assert_eq!(tokens[0].span, Span::new(5, 0));
    }

    #[test]
    fn test_end_of_input_repeats() {
        let mut lexer = Lexer::new("x");
        lexer.next_token().unwrap();

        let first = lexer.next_token().unwrap();
        let second = lexer.next_token().unwrap();
        assert!(first.is_eof());
        assert_eq!(first, second);
    }

    #[test]
    fn test_peek_then_next_returns_same_token() {
        let mut lexer = Lexer::new("  hello world");

        let peeked = lexer.peek_token().unwrap();
        assert_eq!(lexer.position(), 0);

        let next = lexer.next_token().unwrap();
        assert_eq!(peeked, next);
        assert_eq!(lexer.position(), 7);

        let after = lexer.next_token().unwrap();
        assert_eq!(after.lexeme("  hello world"), "world");
    }

    #[test]
    fn test_peek_restores_after_error() {
        let mut lexer = Lexer::new("  ?");

        assert!(lexer.peek_token().is_err());
        assert_eq!(lexer.position(), 0);
        assert_eq!(lexer.scanner.saved_depth(), 0);
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::OpenBrace.to_string(), "'{'");
        assert_eq!(TokenKind::Keyword(Keyword::Else).to_string(), "'else'");
        assert_eq!(TokenKind::IntLiteral(4).to_string(), "integer literal 4");
        assert_eq!(TokenKind::EndOfInput.to_string(), "end of input");
    }

    #[test]
    fn test_same_kind_ignores_literal_value() {
        assert!(TokenKind::IntLiteral(7).same_kind(&TokenKind::IntLiteral(0)));
        assert!(TokenKind::Plus.same_kind(&TokenKind::Plus));
        assert!(!TokenKind::Keyword(Keyword::If).same_kind(&TokenKind::Keyword(Keyword::Else)));
        assert!(!TokenKind::IntLiteral(1).same_kind(&TokenKind::Identifier));
    }
}
