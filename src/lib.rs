#![allow(clippy::module_inception)]

use std::sync::Once;

use tracing::debug;

use crate::{
    errors::{
        errors::{Error, ErrorTip, Location, Phase},
        reporter::{Diagnostics, ErrorReporter},
    },
    interpreter::interpreter::{Interpreter, PrintSink},
    lexer::{lexer::tokenize, tokens::Token},
    parser::parser::parse,
    printer::ast_printer::AstPrinter,
    resolver::resolver::resolve,
};

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod printer;
pub mod resolver;

extern crate regex;

static TRACING_INIT: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG`. Does nothing when the
/// variable is unset or when called a second time.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}

/// Debug output requested on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Print every token before parsing
    pub print_tokens: bool,
    /// Print the parenthesized program before evaluating it
    pub print_ast: bool,
}

/// Outcome of running one piece of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    /// A lexical, syntax or resolution error was reported; nothing was evaluated
    StaticError,
    RuntimeError,
}

/// One interpreter session. Globals and resolved bindings carry over from one
/// `run` to the next, which is what the REPL relies on.
pub struct Lox {
    interpreter: Interpreter,
    options: Options,
}

impl Lox {
    pub fn new(options: Options) -> Self {
        Lox {
            interpreter: Interpreter::new(),
            options,
        }
    }

    pub fn with_output(options: Options, output: Box<dyn PrintSink>) -> Self {
        Lox {
            interpreter: Interpreter::with_output(output),
            options,
        }
    }

    /// Lexes, parses, resolves and evaluates `source`, reporting into
    /// `diagnostics`. Evaluation is skipped when any static error was
    /// reported during this run.
    pub fn run(&mut self, source: &str, diagnostics: &mut Diagnostics) -> Status {
        let mut reporter = RunReporter::new(diagnostics);

        let tokens = tokenize(source.to_string(), &mut reporter);
        if self.options.print_tokens {
            tokens.iter().for_each(Token::debug);
        }

        let statements = parse(tokens, &mut reporter);
        let locals = resolve(&statements, &mut reporter);

        if reporter.static_errors > 0 {
            debug!(errors = reporter.static_errors, "skipping evaluation");
            return Status::StaticError;
        }

        if self.options.print_ast {
            println!("{}", AstPrinter::print_program(&statements));
        }

        self.interpreter.resolve(locals);
        if self.interpreter.interpret(&statements, &mut reporter) {
            Status::Completed
        } else {
            Status::RuntimeError
        }
    }
}

impl Default for Lox {
    fn default() -> Self {
        Lox::new(Options::default())
    }
}

/// Forwards to the session's diagnostics while counting the static errors of
/// the current run, so errors left over from earlier REPL lines do not block
/// evaluation.
struct RunReporter<'d> {
    diagnostics: &'d mut Diagnostics,
    static_errors: usize,
}

impl<'d> RunReporter<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        RunReporter {
            diagnostics,
            static_errors: 0,
        }
    }
}

impl ErrorReporter for RunReporter<'_> {
    fn report(&mut self, error: Error) {
        if error.get_phase() != Phase::Runtime {
            self.static_errors += 1;
        }
        self.diagnostics.report(error);
    }
}

/// Formats an error with the source line it points at:
///
/// ```text
/// Error: UnexpectedToken (Expect ';' after value)
/// -> main.lox
///   |
/// 3 | print a
///   | -------^
/// ```
pub fn format_error(error: &Error, source: &str, file: &str) -> String {
    let line = error.get_line();
    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut output = match error.get_tip() {
        ErrorTip::None => format!("Error: {} ({})\n", error.get_error_name(), error.get_kind()),
        tip => format!(
            "Error: {} ({})\n  tip: {}\n",
            error.get_error_name(),
            error.get_kind(),
            tip
        ),
    };
    output.push_str(&format!("-> {}\n", file));

    let Some(line_text) = source.lines().nth(line.saturating_sub(1)) else {
        return output;
    };

    let line_text = line_text.trim();

    output.push_str(&format!("{:>padding$}\n", "|"));
    output.push_str(&format!("{} | {}\n", line_string, line_text));

    let column = match error.get_location() {
        Location::Lexeme(lexeme) => line_text.find(lexeme.as_str()),
        Location::End => Some(line_text.len()),
        Location::Line => None,
    };

    if let Some(column) = column {
        let arrows = column + 1;
        output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    } else {
        output.push_str(&format!("{:>padding$}\n", "|"));
    }

    output
}

/// How `format_report` lays out each collected error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// `Diagnostics::render`, one line per error.
    Line,
    /// `format_error`, a code frame per error.
    Frame,
}

/// Formats every collected error once, in the given style.
pub fn format_report(diagnostics: &Diagnostics, source: &str, style: ReportStyle) -> String {
    diagnostics
        .errors()
        .iter()
        .map(|error| match style {
            ReportStyle::Line => format!("{}\n", diagnostics.render(error)),
            ReportStyle::Frame => format_error(error, source, diagnostics.file()),
        })
        .collect()
}

/// Writes `format_report` to standard error.
pub fn display_report(diagnostics: &Diagnostics, source: &str, style: ReportStyle) {
    eprint!("{}", format_report(diagnostics, source, style));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        errors::{
            errors::{Error, ErrorImpl},
            reporter::Diagnostics,
        },
        interpreter::interpreter::SharedBuffer,
        lexer::tokens::{Token, TokenKind},
        Lox, Options, ReportStyle, Status, MK_TOKEN,
    };

    #[test]
    fn test_format_error_points_at_lexeme() {
        let token = MK_TOKEN!(TokenKind::Assignment, "=".to_string(), None, 2);
        let error = Error::at_token(ErrorImpl::InvalidAssignmentTarget, &token);

        let formatted = super::format_error(&error, "var a;\n    a + b = c;\n", "main.lox");

        assert_eq!(
            formatted,
            "Error: InvalidAssignmentTarget (Invalid assignment target)\n  tip: only variables can be assigned to\n-> main.lox\n  |\n2 | a + b = c;\n  | ------^\n"
        );
    }

    #[test]
    fn test_format_error_line_only() {
        let error = Error::at_line(ErrorImpl::UnexpectedCharacter { character: '@' }, 1);

        let formatted = super::format_error(&error, "@", "shell");

        assert_eq!(
            formatted,
            "Error: UnexpectedCharacter (Unexpected character)\n-> shell\n  |\n1 | @\n  |\n"
        );
    }

    #[test]
    fn test_format_error_past_last_line() {
        let error = Error::at_line(ErrorImpl::UnterminatedString, 5);

        let formatted = super::format_error(&error, "print 1;", "shell");

        assert_eq!(formatted, "Error: UnterminatedString (Unterminated string)\n-> shell\n");
    }

    #[test]
    fn test_session_reports_only_current_run() {
        let output = SharedBuffer::new();
        let mut lox = Lox::with_output(Options::default(), Box::new(output.clone()));
        let mut diagnostics = Diagnostics::default();

        assert_eq!(lox.run("print ;", &mut diagnostics), Status::StaticError);
        assert_eq!(lox.run("print 1;", &mut diagnostics), Status::Completed);
        assert_eq!(output.lines(), vec!["1"]);
        assert_eq!(diagnostics.count(), 1);
    }

    #[test]
    fn test_report_prints_each_error_once() {
        let source = "print ;\nprint 1";
        let mut diagnostics = Diagnostics::new(Some("main.lox".to_string()));
        let mut lox = Lox::with_output(Options::default(), Box::new(SharedBuffer::new()));
        assert_eq!(lox.run(source, &mut diagnostics), Status::StaticError);
        assert_eq!(diagnostics.count(), 2);

        let lines = super::format_report(&diagnostics, source, ReportStyle::Line);
        assert_eq!(
            lines,
            "main.lox:1: at ';' Expect expression\nmain.lox:2: at end Expect ';' after value\n"
        );

        let frames = super::format_report(&diagnostics, source, ReportStyle::Frame);
        assert_eq!(frames.matches("Error: ").count(), 2);
        assert_eq!(frames.matches("Expect expression").count(), 1);
        assert!(!frames.contains("main.lox:1:"));
    }
}
