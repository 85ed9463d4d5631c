use std::fmt::Display;

use thiserror::Error;

use crate::lexer::tokens::{Token, TokenKind};

/// Where in the source an error points.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Only the line is known (lexical errors).
    Line,
    /// The offending token is the end of input.
    End,
    /// The offending token's lexeme.
    Lexeme(String),
}

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexical,
    Syntax,
    Resolution,
    Runtime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    line: usize,
    location: Location,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, line: usize, location: Location) -> Self {
        Error {
            internal_error: error_impl,
            line,
            location,
        }
    }

    pub fn at_line(error_impl: ErrorImpl, line: usize) -> Self {
        Error::new(error_impl, line, Location::Line)
    }

    pub fn at_token(error_impl: ErrorImpl, token: &Token) -> Self {
        let location = if token.kind == TokenKind::EOF {
            Location::End
        } else {
            Location::Lexeme(token.lexeme.clone())
        };

        Error::new(error_impl, token.line, location)
    }

    pub fn get_line(&self) -> usize {
        self.line
    }

    pub fn get_location(&self) -> &Location {
        &self.location
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_phase(&self) -> Phase {
        self.internal_error.phase()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::TooManyArguments => "TooManyArguments",
            ErrorImpl::TooManyParameters => "TooManyParameters",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::SelfReferencingInitializer { .. } => "SelfReferencingInitializer",
            ErrorImpl::TopLevelReturn => "TopLevelReturn",
            ErrorImpl::OperandMustBeNumber => "OperandMustBeNumber",
            ErrorImpl::OperandsMustBeNumbers => "OperandsMustBeNumbers",
            ErrorImpl::InvalidAdditionOperands => "InvalidAdditionOperands",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::NotCallable => "NotCallable",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::NativeFailure { .. } => "NativeFailure",
            ErrorImpl::StackOverflow { .. } => "StackOverflow",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } | ErrorImpl::UnterminatedString => ErrorTip::None,
            ErrorImpl::UnexpectedToken { expected, .. } if expected.contains("';'") => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::InvalidAssignmentTarget => {
                ErrorTip::Suggestion(String::from("only variables can be assigned to"))
            }
            ErrorImpl::SelfReferencingInitializer { variable } => ErrorTip::Suggestion(format!(
                "rename the inner `{}` or read the outer one before this block",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("declare `{}` with `var` before using it", variable))
            }
            ErrorImpl::UnexpectedArguments { expected, .. } => {
                ErrorTip::Suggestion(format!("pass exactly {} arguments", expected))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Location::Line => write!(f, "[line {}] Error: {}", self.line, self.internal_error),
            Location::End => write!(f, "[line {}] Error at end: {}", self.line, self.internal_error),
            Location::Lexeme(lexeme) => write!(
                f,
                "[line {}] Error at '{}': {}",
                self.line, lexeme, self.internal_error
            ),
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("Unexpected character")]
    UnexpectedCharacter { character: char },
    #[error("Unterminated string")]
    UnterminatedString,

    // Syntax
    #[error("{expected}")]
    UnexpectedToken { token: String, expected: String },
    #[error("Can't have more than 255 arguments")]
    TooManyArguments,
    #[error("Can't have more than 255 parameters")]
    TooManyParameters,
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,

    // Resolution
    #[error("Already a variable with this name in this scope")]
    VariableAlreadyDeclared { variable: String },
    #[error("Can't read local variable in its own initializer")]
    SelfReferencingInitializer { variable: String },
    #[error("Can't return from top-level code")]
    TopLevelReturn,

    // Runtime
    #[error("Operand must be a number")]
    OperandMustBeNumber,
    #[error("Operands must be numbers")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings")]
    InvalidAdditionOperands,
    #[error("Undefined variable '{variable}'")]
    VariableNotDeclared { variable: String },
    #[error("Can only call functions")]
    NotCallable,
    #[error("Expected {expected} arguments but got {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("{message}")]
    NativeFailure { message: String },
    #[error("Stack overflow after {limit} nested calls")]
    StackOverflow { limit: usize },
}

impl ErrorImpl {
    pub fn phase(&self) -> Phase {
        match self {
            ErrorImpl::UnexpectedCharacter { .. } | ErrorImpl::UnterminatedString => Phase::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::TooManyArguments
            | ErrorImpl::TooManyParameters
            | ErrorImpl::InvalidAssignmentTarget => Phase::Syntax,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::SelfReferencingInitializer { .. }
            | ErrorImpl::TopLevelReturn => Phase::Resolution,
            ErrorImpl::OperandMustBeNumber
            | ErrorImpl::OperandsMustBeNumbers
            | ErrorImpl::InvalidAdditionOperands
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::NotCallable
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::NativeFailure { .. }
            | ErrorImpl::StackOverflow { .. } => Phase::Runtime,
        }
    }

    /// Builds the error raised when `expected` was not found at `token`.
    pub fn expected(token: &Token, expected: &str) -> Self {
        ErrorImpl::UnexpectedToken {
            token: token.lexeme.clone(),
            expected: String::from(expected),
        }
    }
}
