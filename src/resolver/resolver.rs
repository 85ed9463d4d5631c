use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expr, ExprId, FunctionDecl, Stmt},
        expressions::{AssignExpr, VariableExpr},
    },
    errors::{errors::ErrorImpl, reporter::ErrorReporter},
    lexer::tokens::Token,
};

/// Binding distance for every locally resolved variable read or assignment.
pub type Locals = HashMap<ExprId, usize>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
}

/// One lexical scope. A name maps to whether its initializer has finished.
#[derive(Debug, Default)]
pub struct Scope {
    variable_lookup: HashMap<String, bool>,
}

impl Scope {
    pub fn declare_variable(&mut self, name: &Token) -> Result<(), ErrorImpl> {
        if self.variable_lookup.contains_key(&name.lexeme) {
            // Still mark it, so the rest of the scope resolves against it
            self.variable_lookup.insert(name.lexeme.clone(), false);
            Err(ErrorImpl::VariableAlreadyDeclared {
                variable: name.lexeme.clone(),
            })
        } else {
            self.variable_lookup.insert(name.lexeme.clone(), false);
            Ok(())
        }
    }

    pub fn define_variable(&mut self, name: &Token) {
        self.variable_lookup.insert(name.lexeme.clone(), true);
    }

    /// `Some(false)` while the variable's initializer is still being resolved.
    pub fn get_variable(&self, name: &str) -> Option<bool> {
        self.variable_lookup.get(name).copied()
    }
}

pub struct Resolver<'r> {
    scopes: Vec<Scope>,
    locals: Locals,
    current_function: FunctionType,
    reporter: &'r mut dyn ErrorReporter,
}

impl<'r> Resolver<'r> {
    pub fn new(reporter: &'r mut dyn ErrorReporter) -> Self {
        Resolver {
            scopes: vec![],
            locals: HashMap::new(),
            current_function: FunctionType::None,
            reporter,
        }
    }

    pub fn into_locals(self) -> Locals {
        self.locals
    }

    fn begin_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!(depth = self.scopes.len(), "begin scope");
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        if let Err(error) = scope.declare_variable(name) {
            self.reporter.resolution_error(name, error);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.define_variable(name);
        }
    }

    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        let found = self
            .scopes
            .iter()
            .rev()
            .position(|scope| scope.get_variable(&name.lexeme).is_some());

        if let Some(distance) = found {
            self.locals.insert(id, distance);
        }
    }

    fn resolve_function(&mut self, function: &FunctionDecl, function_type: FunctionType) {
        let enclosing = std::mem::replace(&mut self.current_function, function_type);

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&function.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    pub fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    pub fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => {
                self.begin_scope();
                self.resolve_stmts(&block.body);
                self.end_scope();
            }
            Stmt::Var(var) => {
                self.declare(&var.name);
                if let Some(initializer) = &var.initializer {
                    self.resolve_expr(initializer);
                }
                self.define(&var.name);
            }
            Stmt::Function(decl) => {
                // Defined before the body so the function can call itself
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(&decl.function, FunctionType::Function);
            }
            Stmt::Expression(expression) => self.resolve_expr(&expression.expression),
            Stmt::Print(print) => self.resolve_expr(&print.value),
            Stmt::If(if_stmt) => {
                self.resolve_expr(&if_stmt.condition);
                self.resolve_stmt(&if_stmt.then_body);
                if let Some(else_body) = &if_stmt.else_body {
                    self.resolve_stmt(else_body);
                }
            }
            Stmt::While(while_stmt) => {
                self.resolve_expr(&while_stmt.condition);
                self.resolve_stmt(&while_stmt.body);
            }
            Stmt::Return(return_stmt) => {
                if self.current_function == FunctionType::None {
                    self.reporter
                        .resolution_error(&return_stmt.keyword, ErrorImpl::TopLevelReturn);
                }
                if let Some(value) = &return_stmt.value {
                    self.resolve_expr(value);
                }
            }
        }
    }

    pub fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Variable(VariableExpr { id, name }) => {
                let uninitialized = self
                    .scopes
                    .last()
                    .and_then(|scope| scope.get_variable(&name.lexeme))
                    == Some(false);

                if uninitialized {
                    self.reporter.resolution_error(
                        name,
                        ErrorImpl::SelfReferencingInitializer {
                            variable: name.lexeme.clone(),
                        },
                    );
                }

                self.resolve_local(*id, name);
            }
            Expr::Assign(AssignExpr { id, name, value }) => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }
            Expr::Binary(binary) => {
                self.resolve_expr(&binary.left);
                self.resolve_expr(&binary.right);
            }
            Expr::Logical(logical) => {
                self.resolve_expr(&logical.left);
                self.resolve_expr(&logical.right);
            }
            Expr::Call(call) => {
                self.resolve_expr(&call.callee);
                for argument in &call.arguments {
                    self.resolve_expr(argument);
                }
            }
            Expr::Grouping(grouping) => self.resolve_expr(&grouping.expression),
            Expr::Unary(unary) => self.resolve_expr(&unary.right),
            Expr::Function(function) => {
                self.resolve_function(&function.function, FunctionType::Function)
            }
            Expr::Literal(_) => {}
        }
    }
}

/// Resolves a program, reporting scope misuse, and returns the binding
/// distances of its local variable references.
#[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
pub fn resolve(statements: &[Stmt], reporter: &mut dyn ErrorReporter) -> Locals {
    let mut resolver = Resolver::new(reporter);
    resolver.resolve_stmts(statements);

    let locals = resolver.into_locals();
    debug!(locals = locals.len(), "resolved");
    locals
}
