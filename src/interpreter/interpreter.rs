//! Interpreter state and the evaluation entry point.
//!
//! The interpreter owns the global frame, the currently active frame and the
//! binding distances computed by the resolver. Expression and statement
//! evaluation live in `expr` and `stmt` and operate on this state.

use std::{cell::RefCell, mem, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::ast::{ExprId, Stmt},
    errors::{
        errors::{Error, ErrorImpl},
        reporter::ErrorReporter,
    },
    lexer::tokens::Token,
    resolver::resolver::Locals,
};

use super::{
    environment::{Environment, SharedEnvironment},
    native::register_natives,
    stmt::execute,
    value::Value,
};

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Normal,
    /// A `return` is unwinding to the nearest call.
    Return(Value),
}

pub type ExecResult = Result<Completion, Error>;

/// Deepest chain of active Lox function calls before a call fails.
pub const MAX_CALL_DEPTH: usize = 1000;

const RED_ZONE: usize = 100 * 1024;
const STACK_PER_GROWTH: usize = 1024 * 1024;

/// Receives the text of every `print` statement, one line at a time.
pub trait PrintSink {
    fn print_line(&mut self, line: &str);
}

/// Writes printed lines to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl PrintSink for StdoutSink {
    fn print_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Collects printed lines in memory. Clones share the same buffer, so one
/// clone can be handed to the interpreter and another kept for reading.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<String>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        SharedBuffer::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Everything printed so far, each line terminated by `\n`.
    pub fn contents(&self) -> String {
        self.0
            .borrow()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }
}

impl PrintSink for SharedBuffer {
    fn print_line(&mut self, line: &str) {
        self.0.borrow_mut().push(line.to_string());
    }
}

pub struct Interpreter {
    /// The outermost frame, holding natives and top-level declarations
    globals: SharedEnvironment,
    /// The frame statements currently execute in
    pub environment: SharedEnvironment,
    /// Binding distances of resolved local references
    locals: Locals,
    /// Number of Lox function bodies currently executing
    call_depth: usize,
    output: Box<dyn PrintSink>,
}

impl Interpreter {
    /// Creates an interpreter printing to standard output.
    pub fn new() -> Self {
        Interpreter::with_output(Box::new(StdoutSink))
    }

    pub fn with_output(output: Box<dyn PrintSink>) -> Self {
        let globals = Environment::new().into_shared();
        register_natives(&globals);

        Interpreter::with_globals(globals, output)
    }

    /// Creates an interpreter over a caller-provided global frame. Nothing is
    /// registered in it.
    pub fn with_globals(globals: SharedEnvironment, output: Box<dyn PrintSink>) -> Self {
        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: Locals::new(),
            call_depth: 0,
            output,
        }
    }

    pub fn globals(&self) -> &SharedEnvironment {
        &self.globals
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Runs a function body in `environment` one call level deeper. Fails at
    /// `paren` once `MAX_CALL_DEPTH` calls are active. The depth is restored
    /// however the body finishes.
    pub fn execute_call(
        &mut self,
        statements: &[Stmt],
        environment: SharedEnvironment,
        paren: &Token,
    ) -> ExecResult {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(Error::at_token(
                ErrorImpl::StackOverflow {
                    limit: MAX_CALL_DEPTH,
                },
                paren,
            ));
        }

        self.call_depth += 1;
        // Grow the native stack when it runs low
        let result = stacker::maybe_grow(RED_ZONE, STACK_PER_GROWTH, || {
            self.execute_block(statements, environment)
        });
        self.call_depth -= 1;

        result
    }

    /// Adds binding distances from a resolver pass. Earlier entries are kept,
    /// so functions declared by previous runs still resolve.
    pub fn resolve(&mut self, locals: Locals) {
        self.locals.extend(locals);
    }

    pub fn print(&mut self, value: &Value) {
        self.output.print_line(&value.to_string());
    }

    /// Executes `statements` in order. The first runtime error aborts the
    /// rest and is reported; returns whether every statement completed.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut dyn ErrorReporter) -> bool {
        for statement in statements {
            if let Err(error) = execute(self, statement) {
                debug!(line = error.get_line(), "runtime error");
                reporter.runtime_error(error);
                return false;
            }
        }

        true
    }

    /// Runs `statements` with `environment` as the active frame, restoring
    /// the previous frame however execution ends.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: SharedEnvironment,
    ) -> ExecResult {
        let previous = mem::replace(&mut self.environment, environment);
        trace!("push frame");

        let mut result = Ok(Completion::Normal);
        for statement in statements {
            match execute(self, statement) {
                Ok(Completion::Normal) => {}
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        trace!("pop frame");
        result
    }

    pub fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value, Error> {
        match self.locals.get(&id) {
            Some(distance) => Environment::get_at(&self.environment, *distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    pub fn assign_variable(&self, id: ExprId, name: &Token, value: Value) -> Result<(), Error> {
        match self.locals.get(&id) {
            Some(distance) => Environment::assign_at(&self.environment, *distance, name, value),
            None => self.globals.borrow_mut().assign(name, value),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
