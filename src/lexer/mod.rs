//! Lexical analysis module for the interpreter.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source text using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line tracking for error reporting, including inside strings
//! - Comments and whitespace handling
//! - Reporting unrecognised characters and unterminated strings without stopping

pub mod lexer;
pub mod tokens;
