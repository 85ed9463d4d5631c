use std::fmt::Display;

use tracing::trace;

use crate::{
    ast::ast::FunctionRef,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

use super::{
    environment::{Environment, SharedEnvironment},
    interpreter::{Completion, Interpreter},
    value::Value,
};

/// Anything that can appear on the left of a call.
pub trait Callable: Display {
    fn arity(&self) -> usize;

    /// Invokes the callable with arguments that have already been evaluated
    /// and checked against `arity`. `paren` is the call's closing parenthesis.
    fn call(
        &self,
        interpreter: &mut Interpreter,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value, Error>;
}

/// A user-defined function together with the frame it was declared in.
pub struct LoxFunction {
    name: Option<String>,
    declaration: FunctionRef,
    closure: SharedEnvironment,
}

impl LoxFunction {
    pub fn new(name: Option<String>, declaration: FunctionRef, closure: SharedEnvironment) -> Self {
        LoxFunction {
            name,
            declaration,
            closure,
        }
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value, Error> {
        trace!(function = %self, arguments = arguments.len(), "call");

        let mut environment = Environment::with_enclosing(self.closure.clone());
        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(&param.lexeme, argument);
        }

        // The body runs directly in the parameter frame, not in a nested block frame
        match interpreter.execute_call(&self.declaration.body, environment.into_shared(), paren)? {
            Completion::Return(value) => Ok(value),
            Completion::Normal => Ok(Value::Nil),
        }
    }
}

impl Display for LoxFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<fn {}>", name),
            None => write!(f, "<fn>"),
        }
    }
}

pub type NativeHandler = fn(&[Value]) -> Result<Value, ErrorImpl>;

/// A function implemented by the host.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: NativeHandler,
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value, Error> {
        trace!(native = self.name, "call");
        (self.function)(&arguments).map_err(|error| Error::at_token(error, paren))
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn>")
    }
}
