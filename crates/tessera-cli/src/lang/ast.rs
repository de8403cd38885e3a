//! Syntax tree of the demo language.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `let name = value;`
    Let { name: String, value: Expr },
    /// `print a, b, ...;`
    Print { args: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Decimal literal, kept as written. Range is checked on evaluation.
    Number { digits: String },
    Variable { name: String },
    Negate { operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn from_symbol(text: &str) -> Option<Self> {
        match text {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }
}

impl Expr {
    pub fn number(digits: impl Into<String>) -> Self {
        Self::Number {
            digits: digits.into(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

/// Values built by the grammar's match actions.
///
/// Operator tails are intermediate: `expr` and `term` fold them into
/// left-associative [`Expr::Binary`] chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Program(Program),
    Stmt(Stmt),
    Expr(Expr),
    Args(Vec<Expr>),
    /// One `op operand` pair of an operator tail.
    Operation(BinaryOp, Expr),
    Tail(Vec<(BinaryOp, Expr)>),
    /// Placeholder for a child an action could not use.
    Missing,
}

impl Node {
    pub fn into_program(self) -> Option<Program> {
        match self {
            Node::Program(program) => Some(program),
            _ => None,
        }
    }

    pub fn into_stmt(self) -> Option<Stmt> {
        match self {
            Node::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn into_expr(self) -> Option<Expr> {
        match self {
            Node::Expr(expr) => Some(expr),
            _ => None,
        }
    }
}
