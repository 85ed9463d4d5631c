use std::{
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::{
    expressions::{
        AssignExpr, BinaryExpr, CallExpr, FunctionExpr, GroupingExpr, LiteralExpr, LogicalExpr,
        UnaryExpr, VariableExpr,
    },
    statements::{
        BlockStmt, ExpressionStmt, FnDeclStmt, IfStmt, PrintStmt, ReturnStmt, VarDeclStmt,
        WhileStmt,
    },
};

static NEXT_EXPR_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a variable-reference or assignment node.
///
/// Ids come from one process-wide counter, so they stay unique across every
/// program parsed by the process and can key resolution data that outlives a
/// single parse (a REPL session, for example).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

impl ExprId {
    pub fn next() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Expressions
///
/// Every pass over the tree matches on this enum exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Grouping(GroupingExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Variable(VariableExpr),
    Assign(AssignExpr),
    Call(CallExpr),
    Function(FunctionExpr),
}

impl Expr {
    pub fn boxed(self) -> Box<Expr> {
        Box::new(self)
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Print(PrintStmt),
    Var(VarDeclStmt),
    Block(BlockStmt),
    If(IfStmt),
    While(WhileStmt),
    Function(FnDeclStmt),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn boxed(self) -> Box<Stmt> {
        Box::new(self)
    }
}

/// Parameters and body shared by function declarations and function
/// expressions. Held behind an `Rc` so a runtime function value can keep the
/// body alive without copying the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub params: Vec<crate::lexer::tokens::Token>,
    pub body: Vec<Stmt>,
}

pub type FunctionRef = Rc<FunctionDecl>;
