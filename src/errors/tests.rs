//! Unit tests for error handling.
//!
//! This module contains tests for error types, their rendering and the
//! collecting reporter.

use crate::{
    errors::{
        errors::{Error, ErrorImpl, ErrorTip, Location, Phase},
        reporter::{Diagnostics, ErrorReporter},
    },
    lexer::tokens::{Token, TokenKind},
    MK_TOKEN,
};

fn identifier(lexeme: &str, line: usize) -> Token {
    MK_TOKEN!(TokenKind::Identifier, lexeme.to_string(), None, line)
}

fn eof(line: usize) -> Token {
    MK_TOKEN!(TokenKind::EOF, String::new(), None, line)
}

#[test]
fn test_error_creation() {
    let error = Error::at_line(ErrorImpl::UnexpectedCharacter { character: '@' }, 10);

    assert_eq!(error.get_error_name(), "UnexpectedCharacter");
    assert_eq!(error.get_line(), 10);
    assert_eq!(error.get_location(), &Location::Line);
}

#[test]
fn test_error_at_token() {
    let error = Error::at_token(ErrorImpl::InvalidAssignmentTarget, &identifier("x", 3));

    assert_eq!(error.get_line(), 3);
    assert_eq!(error.get_location(), &Location::Lexeme("x".to_string()));
}

#[test]
fn test_error_at_end_of_input() {
    let error = Error::at_token(ErrorImpl::expected(&eof(7), "Expect ';' after value"), &eof(7));

    assert_eq!(error.get_location(), &Location::End);
    assert_eq!(error.to_string(), "[line 7] Error at end: Expect ';' after value");
}

#[test]
fn test_error_display() {
    let lexical = Error::at_line(ErrorImpl::UnterminatedString, 2);
    assert_eq!(lexical.to_string(), "[line 2] Error: Unterminated string");

    let runtime = Error::at_token(
        ErrorImpl::UnexpectedArguments {
            expected: 2,
            received: 3,
        },
        &MK_TOKEN!(TokenKind::CloseParen, ")".to_string(), None, 4),
    );
    assert_eq!(
        runtime.to_string(),
        "[line 4] Error at ')': Expected 2 arguments but got 3"
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string()
        }
        .to_string(),
        "Undefined variable 'foo'"
    );
    assert_eq!(ErrorImpl::NotCallable.to_string(), "Can only call functions");
    assert_eq!(
        ErrorImpl::TooManyArguments.to_string(),
        "Can't have more than 255 arguments"
    );
    assert_eq!(
        ErrorImpl::SelfReferencingInitializer {
            variable: "a".to_string()
        }
        .to_string(),
        "Can't read local variable in its own initializer"
    );
}

#[test]
fn test_error_phases() {
    assert_eq!(ErrorImpl::UnterminatedString.phase(), Phase::Lexical);
    assert_eq!(ErrorImpl::TooManyParameters.phase(), Phase::Syntax);
    assert_eq!(ErrorImpl::TopLevelReturn.phase(), Phase::Resolution);
    assert_eq!(ErrorImpl::OperandsMustBeNumbers.phase(), Phase::Runtime);
    assert_eq!(ErrorImpl::StackOverflow { limit: 1 }.phase(), Phase::Runtime);
}

#[test]
fn test_error_tip_none() {
    let error = Error::at_line(ErrorImpl::UnexpectedCharacter { character: '@' }, 1);

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let token = identifier("x", 1);
    let error = Error::at_token(ErrorImpl::expected(&token, "Expect ';' after value"), &token);

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "did you miss a semicolon?"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_diagnostics_counts_phases() {
    let mut diagnostics = Diagnostics::default();

    diagnostics.lexical_error(1, ErrorImpl::UnterminatedString);
    diagnostics.syntax_error(&identifier("a", 2), ErrorImpl::InvalidAssignmentTarget);
    diagnostics.resolution_error(&identifier("b", 3), ErrorImpl::TopLevelReturn);

    assert_eq!(diagnostics.count(), 3);
    assert_eq!(diagnostics.count_phase(Phase::Syntax), 1);
    assert!(diagnostics.has_static_errors());
    assert!(!diagnostics.has_runtime_error());

    diagnostics.runtime_error(Error::at_token(ErrorImpl::NotCallable, &identifier("c", 4)));
    assert!(diagnostics.has_runtime_error());

    diagnostics.clear();
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.count_phase(Phase::Runtime), 0);
}

#[test]
fn test_runtime_errors_are_not_static() {
    let mut diagnostics = Diagnostics::default();
    diagnostics.runtime_error(Error::at_token(ErrorImpl::NotCallable, &identifier("f", 1)));

    assert!(diagnostics.has_errors());
    assert!(!diagnostics.has_static_errors());
}

#[test]
fn test_diagnostics_render() {
    let diagnostics = Diagnostics::new(Some("main.lox".to_string()));

    let at_token = Error::at_token(ErrorImpl::InvalidAssignmentTarget, &identifier("=", 5));
    assert_eq!(
        diagnostics.render(&at_token),
        "main.lox:5: at '=' Invalid assignment target"
    );

    let at_end = Error::at_token(ErrorImpl::expected(&eof(1), "Expect expression"), &eof(1));
    assert_eq!(diagnostics.render(&at_end), "main.lox:1: at end Expect expression");

    let at_line = Error::at_line(ErrorImpl::UnexpectedCharacter { character: '#' }, 9);
    assert_eq!(diagnostics.render(&at_line), "main.lox:9: Unexpected character");
}

#[test]
fn test_diagnostics_render_runtime_error_by_line() {
    let diagnostics = Diagnostics::new(Some("main.lox".to_string()));
    let paren = MK_TOKEN!(TokenKind::CloseParen, ")".to_string(), None, 12);

    let arity = Error::at_token(
        ErrorImpl::UnexpectedArguments {
            expected: 1,
            received: 0,
        },
        &paren,
    );
    assert_eq!(
        diagnostics.render(&arity),
        "main.lox:12: Expected 1 arguments but got 0"
    );

    let overflow = Error::at_token(ErrorImpl::StackOverflow { limit: 1000 }, &paren);
    assert_eq!(overflow.get_phase(), Phase::Runtime);
    assert_eq!(overflow.get_error_name(), "StackOverflow");
    assert_eq!(
        diagnostics.render(&overflow),
        "main.lox:12: Stack overflow after 1000 nested calls"
    );
}

#[test]
fn test_diagnostics_default_file() {
    assert_eq!(Diagnostics::default().file(), "shell");
}
