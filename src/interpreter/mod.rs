//! Tree-walking evaluator.
//!
//! This module executes a resolved program. It includes:
//!
//! - The runtime `Value` type and the `Callable` trait behind function values
//! - Shared, reference-counted environment frames forming the scope chain
//! - Expression evaluation and statement execution over the AST
//! - Native functions registered in the global frame
//! - The print sink the `print` statement writes through

pub mod callable;
pub mod environment;
pub mod expr;
pub mod interpreter;
pub mod native;
pub mod stmt;
pub mod value;

#[cfg(test)]
mod tests;
