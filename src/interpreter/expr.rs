use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, CallExpr, LogicalExpr, UnaryExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{callable::LoxFunction, interpreter::Interpreter, value::Value};

pub fn evaluate(interpreter: &mut Interpreter, expr: &Expr) -> Result<Value, Error> {
    match expr {
        Expr::Literal(literal) => Ok(Value::from(&literal.value)),
        Expr::Grouping(grouping) => evaluate(interpreter, &grouping.expression),
        Expr::Unary(unary) => evaluate_unary(interpreter, unary),
        Expr::Binary(binary) => evaluate_binary(interpreter, binary),
        Expr::Logical(logical) => evaluate_logical(interpreter, logical),
        Expr::Variable(variable) => interpreter.look_up_variable(variable.id, &variable.name),
        Expr::Assign(assign) => {
            let value = evaluate(interpreter, &assign.value)?;
            interpreter.assign_variable(assign.id, &assign.name, value.clone())?;
            Ok(value)
        }
        Expr::Call(call) => evaluate_call(interpreter, call),
        Expr::Function(function) => Ok(Value::Callable(Rc::new(LoxFunction::new(
            None,
            Rc::clone(&function.function),
            Rc::clone(&interpreter.environment),
        )))),
    }
}

fn evaluate_unary(interpreter: &mut Interpreter, unary: &UnaryExpr) -> Result<Value, Error> {
    let right = evaluate(interpreter, &unary.right)?;

    match unary.operator.kind {
        TokenKind::Not => Ok(Value::Bool(!right.is_truthy())),
        TokenKind::Dash => match right {
            Value::Number(number) => Ok(Value::Number(-number)),
            _ => Err(Error::at_token(ErrorImpl::OperandMustBeNumber, &unary.operator)),
        },
        _ => unreachable!("parser only builds unary expressions for '!' and '-'"),
    }
}

fn evaluate_binary(interpreter: &mut Interpreter, binary: &BinaryExpr) -> Result<Value, Error> {
    let left = evaluate(interpreter, &binary.left)?;
    let right = evaluate(interpreter, &binary.right)?;
    let operator = &binary.operator;

    match operator.kind {
        TokenKind::Equals => Ok(Value::Bool(left == right)),
        TokenKind::NotEquals => Ok(Value::Bool(left != right)),
        TokenKind::Plus => match (left, right) {
            (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
            (Value::String(left), Value::String(right)) => {
                Ok(Value::String(Rc::from(format!("{}{}", left, right))))
            }
            _ => Err(Error::at_token(ErrorImpl::InvalidAdditionOperands, operator)),
        },
        _ => {
            let (left, right) = number_operands(operator, &left, &right)?;

            Ok(match operator.kind {
                TokenKind::Dash => Value::Number(left - right),
                TokenKind::Star => Value::Number(left * right),
                TokenKind::Slash => Value::Number(left / right),
                TokenKind::Percent => Value::Number(left % right),
                TokenKind::Less => Value::Bool(left < right),
                TokenKind::LessEquals => Value::Bool(left <= right),
                TokenKind::Greater => Value::Bool(left > right),
                TokenKind::GreaterEquals => Value::Bool(left >= right),
                _ => unreachable!("no binary operator registered for {}", operator.kind),
            })
        }
    }
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64), Error> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok((*left, *right)),
        _ => Err(Error::at_token(ErrorImpl::OperandsMustBeNumbers, operator)),
    }
}

/// Yields the deciding operand itself, not a boolean.
fn evaluate_logical(interpreter: &mut Interpreter, logical: &LogicalExpr) -> Result<Value, Error> {
    let left = evaluate(interpreter, &logical.left)?;

    let short_circuits = match logical.operator.kind {
        TokenKind::Or => left.is_truthy(),
        _ => !left.is_truthy(),
    };

    if short_circuits {
        Ok(left)
    } else {
        evaluate(interpreter, &logical.right)
    }
}

fn evaluate_call(interpreter: &mut Interpreter, call: &CallExpr) -> Result<Value, Error> {
    let callee = evaluate(interpreter, &call.callee)?;

    let mut arguments = Vec::with_capacity(call.arguments.len());
    for argument in &call.arguments {
        arguments.push(evaluate(interpreter, argument)?);
    }

    let Value::Callable(function) = callee else {
        return Err(Error::at_token(ErrorImpl::NotCallable, &call.paren));
    };

    if arguments.len() != function.arity() {
        return Err(Error::at_token(
            ErrorImpl::UnexpectedArguments {
                expected: function.arity(),
                received: arguments.len(),
            },
            &call.paren,
        ));
    }

    trace!(line = call.paren.line, callee = %function, "calling");
    function.call(interpreter, &call.paren, arguments)
}
