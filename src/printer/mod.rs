//! Read-only renderings of the AST.
//!
//! - `AstPrinter` produces a parenthesized prefix form, used by `--ast` and
//!   by tests that check tree shape
//! - `SourcePrinter` produces canonical source text that parses back into an
//!   equivalent tree

pub mod ast_printer;
pub mod source_printer;
