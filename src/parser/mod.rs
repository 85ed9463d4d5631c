//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a list of statements. It uses a Pratt parser for expressions
//! with binding powers mirroring the precedence levels of the grammar
//! (assignment, `or`, `and`, equality, comparison, term, factor, unary, call)
//! and handles:
//!
//! - Declaration and statement parsing (variables, functions, control flow)
//! - Desugaring `for` loops into `while` loops
//! - Expression parsing (logical and binary operators, calls, function literals)
//! - Statement-level error recovery, so one syntax error does not hide the next
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
