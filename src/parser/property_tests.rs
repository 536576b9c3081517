//! Property-based tests for the scanner, lexer and parser.
//!
//! 1. **Save/restore nests**: random save/restore/advance sequences agree
//!    with a plain stack-of-positions model
//! 2. **Spans tile the source**: tokens are in order, inside the input, and
//!    only whitespace lies between them
//! 3. **Peek is idempotent**: `peek_token` followed by `next_token` yields the
//!    same token and consumes exactly one
//! 4. **Parser never panics**: arbitrary input yields `Ok` or `Err`
//! 5. **Long chains stay bounded**: flat operator chains either parse or stop
//!    at the height limit, and whatever comes back can be dropped

use proptest::prelude::*;

use super::lexer::{Lexer, TokenKind};
use super::parse::{ParseError, Parser, DEFAULT_MAX_EXPRESSION_HEIGHT};
use super::scanner::Scanner;

#[derive(Debug, Clone)]
enum ScanOp {
    Advance,
    Mark,
    Save,
    Restore,
}

fn scan_op() -> impl Strategy<Value = ScanOp> {
    prop_oneof![
        4 => Just(ScanOp::Advance),
        1 => Just(ScanOp::Mark),
        2 => Just(ScanOp::Save),
        2 => Just(ScanOp::Restore),
    ]
}

/// Inputs made of fragments the lexer accepts, glued with whitespace.
fn valid_source() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        "[0-9]{1,9}",
        "[a-zA-Z][a-zA-Z0-9]{0,6}",
        Just("if".to_string()),
        Just("ELSE".to_string()),
        Just("return".to_string()),
        "[-+*/=(){}]",
    ];
    let gap = "[ \t\r\n]{0,3}";
    prop::collection::vec((gap, fragment), 0..24).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(ws, frag)| format!("{ws}{frag} "))
            .collect()
    })
}

/// `x = 1` followed by `ops` additive operators with literal or
/// parenthesised operands.
fn additive_chain() -> impl Strategy<Value = (usize, String)> {
    let step = prop_oneof![
        3 => "[+-] [0-9]{1,3}",
        1 => "[+-] \\([0-9] [*/] [0-9]\\)",
    ];
    prop::collection::vec(step, 0..3000).prop_map(|steps| {
        let mut source = String::from("x = 1");
        for step in &steps {
            source.push(' ');
            source.push_str(step);
        }
        (steps.len(), source)
    })
}

proptest! {
    #[test]
    fn save_restore_matches_stack_model(
        source in "[a-z0-9 ]{0,40}",
        ops in prop::collection::vec(scan_op(), 0..80),
    ) {
        let mut scanner = Scanner::new(&source);
        let mut model: Vec<(usize, usize)> = Vec::new();
        let mut mark = 0;

        for op in ops {
            match op {
                ScanOp::Advance => {
                    let before = scanner.position();
                    let ch = scanner.advance();
                    prop_assert_eq!(ch.is_some(), before < source.len());
                }
                ScanOp::Mark => {
                    scanner.mark();
                    mark = scanner.position();
                }
                ScanOp::Save => {
                    scanner.save();
                    model.push((scanner.position(), mark));
                }
                ScanOp::Restore => match model.pop() {
                    Some((position, saved_mark)) => {
                        prop_assert!(scanner.restore().is_ok());
                        prop_assert_eq!(scanner.position(), position);
                        prop_assert_eq!(scanner.mark_position(), saved_mark);
                        mark = saved_mark;
                    }
                    None => {
                        let before = scanner.position();
                        prop_assert!(scanner.restore().is_err());
                        prop_assert_eq!(scanner.position(), before);
                    }
                },
            }

            prop_assert_eq!(scanner.saved_depth(), model.len());
            prop_assert!(scanner.mark_position() <= scanner.position());
            prop_assert!(scanner.position() <= source.len());
        }
    }

    #[test]
    fn token_spans_tile_the_source(source in valid_source()) {
        let tokens = Lexer::new(&source).tokenize().unwrap();

        let mut rebuilt = String::new();
        let mut cursor = 0;
        for token in &tokens {
            prop_assert!(token.span.offset >= cursor);
            prop_assert!(token.span.end() <= source.len());
            prop_assert_eq!(token.span.is_empty(), token.kind == TokenKind::EndOfInput);

            let gap = &source[cursor..token.span.offset];
            prop_assert!(gap.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n')));

            rebuilt.push_str(gap);
            rebuilt.push_str(token.lexeme(&source));
            cursor = token.span.end();
        }

        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
        prop_assert_eq!(rebuilt, source);
    }

    #[test]
    fn peek_then_next_agree(source in valid_source()) {
        let mut lexer = Lexer::new(&source);

        loop {
            let before = lexer.position();
            let peeked = lexer.peek_token();
            prop_assert_eq!(lexer.position(), before);

            let next = lexer.next_token();
            prop_assert_eq!(&peeked, &next);

            match next {
                Ok(token) if token.kind == TokenKind::EndOfInput => break,
                Ok(token) => {
                    prop_assert_eq!(lexer.position(), token.span.end());
                }
                Err(_) => break,
            }
        }
    }

    #[test]
    fn parser_never_panics(source in "\\PC{0,512}") {
        if let Ok(mut parser) = Parser::new(&source) {
            let _ = parser.parse_program();
        }
    }

    #[test]
    fn parser_never_panics_on_token_soup(source in valid_source()) {
        if let Ok(mut parser) = Parser::new(&source) {
            let _ = parser.parse_program();
        }
    }

    #[test]
    fn long_chains_stay_bounded((ops, source) in additive_chain()) {
        let result = crate::parse(&source);

        if ops <= DEFAULT_MAX_EXPRESSION_HEIGHT {
            prop_assert!(result.is_ok(), "{} operators: {:?}", ops, result.as_ref().err());
        } else {
            let is_limit = matches!(result, Err(ParseError::RecursionLimitExceeded { .. }));
            prop_assert!(is_limit);
        }
        drop(result);
    }
}
