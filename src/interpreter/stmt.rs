use std::rc::Rc;

use crate::ast::ast::Stmt;

use super::{
    callable::LoxFunction,
    environment::Environment,
    expr::evaluate,
    interpreter::{Completion, ExecResult, Interpreter},
    value::Value,
};

pub fn execute(interpreter: &mut Interpreter, statement: &Stmt) -> ExecResult {
    match statement {
        Stmt::Expression(expression) => {
            evaluate(interpreter, &expression.expression)?;
        }
        Stmt::Print(print) => {
            let value = evaluate(interpreter, &print.value)?;
            interpreter.print(&value);
        }
        Stmt::Var(var) => {
            let value = match &var.initializer {
                Some(initializer) => evaluate(interpreter, initializer)?,
                None => Value::Nil,
            };
            interpreter
                .environment
                .borrow_mut()
                .define(&var.name.lexeme, value);
        }
        Stmt::Block(block) => {
            let environment =
                Environment::with_enclosing(Rc::clone(&interpreter.environment)).into_shared();
            return interpreter.execute_block(&block.body, environment);
        }
        Stmt::If(if_stmt) => {
            if evaluate(interpreter, &if_stmt.condition)?.is_truthy() {
                return execute(interpreter, &if_stmt.then_body);
            } else if let Some(else_body) = &if_stmt.else_body {
                return execute(interpreter, else_body);
            }
        }
        Stmt::While(while_stmt) => {
            while evaluate(interpreter, &while_stmt.condition)?.is_truthy() {
                if let Completion::Return(value) = execute(interpreter, &while_stmt.body)? {
                    return Ok(Completion::Return(value));
                }
            }
        }
        Stmt::Function(declaration) => {
            let function = LoxFunction::new(
                Some(declaration.name.lexeme.clone()),
                Rc::clone(&declaration.function),
                Rc::clone(&interpreter.environment),
            );
            interpreter
                .environment
                .borrow_mut()
                .define(&declaration.name.lexeme, Value::Callable(Rc::new(function)));
        }
        Stmt::Return(return_stmt) => {
            let value = match &return_stmt.value {
                Some(value) => evaluate(interpreter, value)?,
                None => Value::Nil,
            };
            return Ok(Completion::Return(value));
        }
    }

    Ok(Completion::Normal)
}
