//! Error types and error reporting for the interpreter.
//!
//! This module defines the error values raised by every stage of the
//! pipeline and the sink they are reported to. It includes:
//!
//! - Error structures with source line and token information
//! - Specific error variants for lexing, parsing, resolution and evaluation
//! - The `ErrorReporter` capability the core reports into
//! - `Diagnostics`, a reporter that collects and counts what it receives

pub mod errors;
pub mod reporter;

#[cfg(test)]
mod tests;
