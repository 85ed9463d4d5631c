use crate::ast::{
    ast::{Expr, FunctionDecl, Stmt},
    expressions::LiteralValue,
};

/// Renders expressions and statements in parenthesized prefix form, such as
/// `(+ 1 (* 2 3))` or `(var a (group 1))`.
pub struct AstPrinter;

impl AstPrinter {
    /// One line per top-level statement.
    pub fn print_program(statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(AstPrinter::print_stmt)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expression) => AstPrinter::print_expr(&expression.expression),
            Stmt::Print(print) => parenthesize("print", [AstPrinter::print_expr(&print.value)]),
            Stmt::Var(var) => {
                let mut parts = vec![var.name.lexeme.clone()];
                if let Some(initializer) = &var.initializer {
                    parts.push(AstPrinter::print_expr(initializer));
                }
                parenthesize("var", parts)
            }
            Stmt::Block(block) => parenthesize("block", block.iter().map(AstPrinter::print_stmt)),
            Stmt::If(if_stmt) => {
                let mut parts = vec![
                    AstPrinter::print_expr(&if_stmt.condition),
                    AstPrinter::print_stmt(&if_stmt.then_body),
                ];
                if let Some(else_body) = &if_stmt.else_body {
                    parts.push(AstPrinter::print_stmt(else_body));
                }
                parenthesize("if", parts)
            }
            Stmt::While(while_stmt) => parenthesize(
                "while",
                [
                    AstPrinter::print_expr(&while_stmt.condition),
                    AstPrinter::print_stmt(&while_stmt.body),
                ],
            ),
            Stmt::Function(declaration) => {
                let mut parts = vec![declaration.name.lexeme.clone()];
                parts.extend(function_parts(&declaration.function));
                parenthesize("fun", parts)
            }
            Stmt::Return(return_stmt) => {
                parenthesize("return", return_stmt.value.iter().map(AstPrinter::print_expr))
            }
        }
    }

    pub fn print_expr(expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => match &literal.value {
                LiteralValue::String(string) => format!("\"{}\"", string),
                other => other.to_string(),
            },
            Expr::Grouping(grouping) => {
                parenthesize("group", [AstPrinter::print_expr(&grouping.expression)])
            }
            Expr::Unary(unary) => {
                parenthesize(&unary.operator.lexeme, [AstPrinter::print_expr(&unary.right)])
            }
            Expr::Binary(binary) => parenthesize(
                &binary.operator.lexeme,
                [AstPrinter::print_expr(&binary.left), AstPrinter::print_expr(&binary.right)],
            ),
            Expr::Logical(logical) => parenthesize(
                &logical.operator.lexeme,
                [AstPrinter::print_expr(&logical.left), AstPrinter::print_expr(&logical.right)],
            ),
            Expr::Variable(variable) => variable.name.lexeme.clone(),
            Expr::Assign(assign) => parenthesize(
                "set",
                [assign.name.lexeme.clone(), AstPrinter::print_expr(&assign.value)],
            ),
            Expr::Call(call) => {
                let mut parts = vec![AstPrinter::print_expr(&call.callee)];
                parts.extend(call.arguments.iter().map(AstPrinter::print_expr));
                parenthesize("call", parts)
            }
            Expr::Function(function) => parenthesize("fun", function_parts(&function.function)),
        }
    }
}

fn function_parts(function: &FunctionDecl) -> Vec<String> {
    let params: Vec<&str> = function.params.iter().map(|param| param.lexeme.as_str()).collect();

    let mut parts = vec![format!("({})", params.join(" "))];
    parts.extend(function.body.iter().map(AstPrinter::print_stmt));
    parts
}

fn parenthesize(name: &str, parts: impl IntoIterator<Item = String>) -> String {
    let mut result = format!("({}", name);

    for part in parts {
        result.push(' ');
        result.push_str(&part);
    }

    result.push(')');
    result
}
