//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= IDENT '=' expression
//!             | 'if' expression block ('else' block)?
//! block     ::= '{' statement* '}'
//! program   ::= statement* EOF
//! ```
//!
//! Statements need no terminator: every statement form ends in a way the
//! LL(1) lookahead can see (the end of an expression or a closing brace).
//!
//! All parsing methods are implemented as methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, TokenKind};
use crate::parser::parse::{Expected, ParseError, Parser};

impl Parser<'_> {
    /// Parse a statement
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        if self.check(&TokenKind::Identifier) {
            return self.parse_assignment();
        }

        if self.match_token(&TokenKind::Keyword(Keyword::If))? {
            return self.parse_if_statement();
        }

        Err(self.unexpected(Expected::Statement))
    }

    /// Parse assignment: name = expr
    fn parse_assignment(&mut self) -> Result<Statement, ParseError> {
        let target = self.expect(&TokenKind::Identifier)?.span;
        self.expect(&TokenKind::Equals)?;
        let value = self.parse_expression()?;

        Ok(Statement::Assign { target, value })
    }

    /// Parse if statement (the `if` keyword is already consumed)
    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        let condition = self.parse_expression()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.match_token(&TokenKind::Keyword(Keyword::Else))? {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// Parse a braced block of statements
    pub(crate) fn parse_block(&mut self) -> Result<Program, ParseError> {
        self.expect(&TokenKind::OpenBrace)?;

        self.nested(|p| {
            let mut block = Program::new();

            while !p.match_token(&TokenKind::CloseBrace)? {
                if p.is_at_end() {
                    return Err(ParseError::UnexpectedEndOfInput {
                        expected: Expected::Token(TokenKind::CloseBrace),
                    });
                }
                block.statements.push(p.parse_statement()?);
            }

            Ok(block)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::ParserConfig;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.parse_program()
    }

    #[test]
    fn test_parse_assignment() {
        let source = "answer = 6 * 7";
        let program = parse(source).unwrap();

        assert_eq!(program.len(), 1);
        match &program.statements[0] {
            Statement::Assign { target, value } => {
                assert_eq!(target.text(source), "answer");
                assert_eq!(
                    *value,
                    Expression::binary(BinOp::Mul, Expression::int(6), Expression::int(7))
                );
            }
            _ => panic!("Expected assignment"),
        }
    }

    #[test]
    fn test_parse_consecutive_assignments() {
        let source = "a = 1 b = 2\nc = (3)";
        let program = parse(source).unwrap();

        let names: Vec<&str> = program
            .statements
            .iter()
            .map(|s| match s {
                Statement::Assign { target, .. } => target.text(source),
                _ => panic!("Expected assignment"),
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_if_without_else() {
        let program = parse("if 1 { x = 2 }").unwrap();

        match &program.statements[0] {
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                assert_eq!(*condition, Expression::int(1));
                assert_eq!(then_branch.len(), 1);
                assert!(else_branch.is_none());
            }
            _ => panic!("Expected if statement"),
        }
    }

    #[test]
    fn test_parse_if_else_with_nested_if() {
        let source = "if 1 - 1 { } else { if 2 { y = 3 } z = 4 }";
        let program = parse(source).unwrap();

        match &program.statements[0] {
            Statement::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => {
                assert!(then_branch.is_empty());
                assert_eq!(else_branch.len(), 2);
                assert!(matches!(else_branch.statements[0], Statement::If { .. }));
                assert!(matches!(else_branch.statements[1], Statement::Assign { .. }));
            }
            _ => panic!("Expected if/else statement"),
        }
    }

    #[test]
    fn test_uppercase_keywords() {
        let program = parse("IF 1 { a = 1 } ELSE { a = 2 }").unwrap();
        assert!(matches!(
            program.statements[0],
            Statement::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_assignment_requires_equals() {
        assert_eq!(
            parse("x 1").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: Expected::Token(TokenKind::Equals),
                found: TokenKind::IntLiteral(1),
                position: 2,
            }
        );
    }

    #[test]
    fn test_if_requires_block() {
        assert_eq!(
            parse("if 1 x = 2").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: Expected::Token(TokenKind::OpenBrace),
                found: TokenKind::Identifier,
                position: 5,
            }
        );
    }

    #[test]
    fn test_unterminated_block() {
        assert_eq!(
            parse("if 1 { x = 2").unwrap_err(),
            ParseError::UnexpectedEndOfInput {
                expected: Expected::Token(TokenKind::CloseBrace)
            }
        );
    }

    #[test]
    fn test_stray_token_at_top_level() {
        let err = parse("x = 1 )").unwrap_err();

        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Statement,
                found: TokenKind::CloseParen,
                position: 6,
            }
        );
        assert_eq!(err.to_string(), "expected identifier or 'if', found ')'");
    }

    #[test]
    fn test_dangling_else_is_rejected() {
        assert_eq!(
            parse("else { }").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: Expected::Statement,
                found: TokenKind::Keyword(Keyword::Else),
                position: 0,
            }
        );
    }

    #[test]
    fn test_return_keyword_is_not_a_statement() {
        assert!(matches!(
            parse("return 1").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: Expected::Statement,
                ..
            }
        ));
    }

    #[test]
    fn test_block_nesting_limit() {
        let source = "if 1 { if 1 { if 1 { } } }";
        let config = ParserConfig::default().with_max_depth(2);
        let err = Parser::with_config(source, config)
            .unwrap()
            .parse_program()
            .unwrap_err();

        assert_eq!(
            err,
            ParseError::RecursionLimitExceeded {
                limit: 2,
                position: 21
            }
        );
    }
}
