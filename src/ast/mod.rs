/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The closed `Expr` and `Stmt` sum types and node identity
/// - expressions: Payload records for each expression variant
/// - statements: Payload records for each statement variant
pub mod ast;
pub mod expressions;
pub mod statements;
