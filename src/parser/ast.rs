// AST (Abstract Syntax Tree) definitions for parsnip programs

use super::scanner::Span;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(&self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

/// Arithmetic expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    IntLiteral(u32),
    BinaryOp {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn int(value: u32) -> Self {
        Expression::IntLiteral(value)
    }

    pub fn binary(op: BinOp, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name = expr`; `target` is the identifier's span in the source
    Assign { target: Span, value: Expression },
    If {
        condition: Expression,
        then_branch: Program,
        else_branch: Option<Program>,
    },
}

/// A sequence of statements: the whole input, or the inside of a block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
