use crate::ast::{
    ast::{Expr, FunctionDecl, Stmt},
    expressions::LiteralValue,
};

const INDENT: &str = "    ";

/// Renders the AST back into source text.
///
/// Precedence is never re-derived: explicit parentheses in the original
/// program survive as grouping nodes, so printing operands in order is enough
/// for the output to parse back into the same tree. `for` loops come out in
/// their desugared `while` form.
#[derive(Debug, Default)]
pub struct SourcePrinter {
    output: String,
    depth: usize,
}

impl SourcePrinter {
    pub fn print_program(statements: &[Stmt]) -> String {
        let mut printer = SourcePrinter::default();

        for stmt in statements {
            printer.line(stmt);
        }

        printer.output
    }

    pub fn print_expr(expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => match &literal.value {
                LiteralValue::String(string) => format!("\"{}\"", string),
                other => other.to_string(),
            },
            Expr::Grouping(grouping) => format!("({})", SourcePrinter::print_expr(&grouping.expression)),
            Expr::Unary(unary) => {
                format!("{}{}", unary.operator.lexeme, SourcePrinter::print_expr(&unary.right))
            }
            Expr::Binary(binary) => format!(
                "{} {} {}",
                SourcePrinter::print_expr(&binary.left),
                binary.operator.lexeme,
                SourcePrinter::print_expr(&binary.right)
            ),
            Expr::Logical(logical) => format!(
                "{} {} {}",
                SourcePrinter::print_expr(&logical.left),
                logical.operator.lexeme,
                SourcePrinter::print_expr(&logical.right)
            ),
            Expr::Variable(variable) => variable.name.lexeme.clone(),
            Expr::Assign(assign) => format!(
                "{} = {}",
                assign.name.lexeme,
                SourcePrinter::print_expr(&assign.value)
            ),
            Expr::Call(call) => {
                let arguments: Vec<String> =
                    call.arguments.iter().map(SourcePrinter::print_expr).collect();
                format!("{}({})", SourcePrinter::print_expr(&call.callee), arguments.join(", "))
            }
            Expr::Function(function) => {
                let mut printer = SourcePrinter::default();
                printer.function("fun ", &function.function);
                printer.output
            }
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.output.push_str(INDENT);
        }
    }

    fn line(&mut self, stmt: &Stmt) {
        self.indent();
        self.stmt(stmt);
        self.output.push('\n');
    }

    /// Writes `stmt` at the current position, without leading indentation or
    /// a trailing newline.
    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expression) => {
                self.output.push_str(&SourcePrinter::print_expr(&expression.expression));
                self.output.push(';');
            }
            Stmt::Print(print) => {
                self.output.push_str("print ");
                self.output.push_str(&SourcePrinter::print_expr(&print.value));
                self.output.push(';');
            }
            Stmt::Var(var) => {
                self.output.push_str("var ");
                self.output.push_str(&var.name.lexeme);
                if let Some(initializer) = &var.initializer {
                    self.output.push_str(" = ");
                    self.output.push_str(&SourcePrinter::print_expr(initializer));
                }
                self.output.push(';');
            }
            Stmt::Block(block) => self.block(&block.body),
            Stmt::If(if_stmt) => {
                self.output.push_str("if (");
                self.output.push_str(&SourcePrinter::print_expr(&if_stmt.condition));
                self.output.push_str(") ");
                self.stmt(&if_stmt.then_body);
                if let Some(else_body) = &if_stmt.else_body {
                    self.output.push_str(" else ");
                    self.stmt(else_body);
                }
            }
            Stmt::While(while_stmt) => {
                self.output.push_str("while (");
                self.output.push_str(&SourcePrinter::print_expr(&while_stmt.condition));
                self.output.push_str(") ");
                self.stmt(&while_stmt.body);
            }
            Stmt::Function(declaration) => {
                let header = format!("fun {}", declaration.name.lexeme);
                self.function(&header, &declaration.function);
            }
            Stmt::Return(return_stmt) => {
                self.output.push_str("return");
                if let Some(value) = &return_stmt.value {
                    self.output.push(' ');
                    self.output.push_str(&SourcePrinter::print_expr(value));
                }
                self.output.push(';');
            }
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.output.push_str("{}");
            return;
        }

        self.output.push_str("{\n");
        self.depth += 1;
        for stmt in body {
            self.line(stmt);
        }
        self.depth -= 1;
        self.indent();
        self.output.push('}');
    }

    fn function(&mut self, header: &str, function: &FunctionDecl) {
        let params: Vec<&str> = function.params.iter().map(|param| param.lexeme.as_str()).collect();

        self.output.push_str(header);
        self.output.push('(');
        self.output.push_str(&params.join(", "));
        self.output.push_str(") ");
        self.block(&function.body);
    }
}
