//! Static resolution of variable bindings.
//!
//! This module walks the AST once before evaluation and computes, for every
//! variable read and assignment, how many enclosing scopes separate it from
//! the scope that declares it. It also detects misuse of scopes:
//!
//! - Declaring the same name twice in one local scope
//! - Reading a local variable inside its own initializer
//! - `return` outside of any function
//!
//! References not found in any local scope are left unresolved and are
//! looked up as globals at runtime.

pub mod resolver;

#[cfg(test)]
mod tests;
