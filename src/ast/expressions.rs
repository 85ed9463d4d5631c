use std::fmt::Display;

use crate::lexer::tokens::Token;

use super::ast::{Expr, ExprId, FunctionRef};

// LITERALS

/// Value of a literal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Number(number) => write!(f, "{}", number),
            LiteralValue::String(string) => write!(f, "{}", string),
            LiteralValue::Bool(boolean) => write!(f, "{}", boolean),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}

/// Literal Expression
/// A number, string, boolean or `nil` written directly in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
}

// COMPLEX

/// Grouping Expression
/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingExpr {
    pub expression: Box<Expr>,
}

/// Unary Expression
/// `!` or `-` applied to one operand.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: Token,
    pub right: Box<Expr>,
}

/// Binary Expression
/// Arithmetic, comparison and equality operators. Both operands are always evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// Logical Expression
/// `and` / `or`, which only evaluate the right operand when needed.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

/// Variable Expression
/// A read of a named variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    pub id: ExprId,
    pub name: Token,
}

/// Assignment Expression
/// Assigns to a named variable and yields the assigned value.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub id: ExprId,
    pub name: Token,
    pub value: Box<Expr>,
}

/// Call Expression
/// `paren` is the closing parenthesis, which runtime call errors point at.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

/// Function Expression
/// An anonymous `fun (params) { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub keyword: Token,
    pub function: FunctionRef,
}
