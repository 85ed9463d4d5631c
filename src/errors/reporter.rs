use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::lexer::tokens::Token;

use super::errors::{Error, ErrorImpl, Location, Phase};

/// Sink the pipeline reports errors into.
///
/// Reports are fire-and-forget: no stage of the core reads back what has been
/// reported. Implementors only need `report`; the four stage-specific
/// operations locate the error and forward to it.
pub trait ErrorReporter {
    fn report(&mut self, error: Error);

    fn lexical_error(&mut self, line: usize, error: ErrorImpl) {
        self.report(Error::at_line(error, line));
    }

    fn syntax_error(&mut self, token: &Token, error: ErrorImpl) {
        self.report(Error::at_token(error, token));
    }

    fn resolution_error(&mut self, token: &Token, error: ErrorImpl) {
        self.report(Error::at_token(error, token));
    }

    fn runtime_error(&mut self, error: Error) {
        self.report(error);
    }
}

/// Collects every reported error, keeping a count per phase.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    file: Rc<String>,
    errors: Vec<Error>,
    counts: HashMap<Phase, usize>,
}

impl Diagnostics {
    pub fn new(file: Option<String>) -> Self {
        Diagnostics {
            file: Rc::new(file.unwrap_or_else(|| String::from("shell"))),
            errors: vec![],
            counts: HashMap::new(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn count_phase(&self, phase: Phase) -> usize {
        self.counts.get(&phase).copied().unwrap_or(0)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any lexical, syntax or resolution error has been recorded.
    pub fn has_static_errors(&self) -> bool {
        self.count() > self.count_phase(Phase::Runtime)
    }

    pub fn has_runtime_error(&self) -> bool {
        self.count_phase(Phase::Runtime) > 0
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.counts.clear();
    }

    /// Renders one error as `<file>:<line>: at '<lexeme>' <message>`. Runtime
    /// errors drop the location and render as `<file>:<line>: <message>`.
    pub fn render(&self, error: &Error) -> String {
        if error.get_phase() == Phase::Runtime {
            return format!("{}:{}: {}", self.file, error.get_line(), error.get_kind());
        }

        match error.get_location() {
            Location::Line => format!("{}:{}: {}", self.file, error.get_line(), error.get_kind()),
            Location::End => format!(
                "{}:{}: at end {}",
                self.file,
                error.get_line(),
                error.get_kind()
            ),
            Location::Lexeme(lexeme) => format!(
                "{}:{}: at '{}' {}",
                self.file,
                error.get_line(),
                lexeme,
                error.get_kind()
            ),
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics::new(None)
    }
}

impl ErrorReporter for Diagnostics {
    fn report(&mut self, error: Error) {
        debug!(phase = ?error.get_phase(), line = error.get_line(), "{}", error.get_kind());
        *self.counts.entry(error.get_phase()).or_insert(0) += 1;
        self.errors.push(error);
    }
}
