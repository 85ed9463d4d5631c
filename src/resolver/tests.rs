//! Unit tests for the resolver module.

use pretty_assertions::assert_eq;

use crate::{
    ast::ast::{Expr, Stmt},
    errors::{
        errors::{ErrorImpl, Location, Phase},
        reporter::Diagnostics,
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::resolver::{resolve, Locals};

fn resolve_source(source: &str) -> (Vec<Stmt>, Locals, Diagnostics) {
    let mut diagnostics = Diagnostics::new(Some("test.lox".to_string()));
    let tokens = tokenize(source.to_string(), &mut diagnostics);
    let statements = parse(tokens, &mut diagnostics);
    assert!(!diagnostics.has_errors(), "unexpected errors: {:?}", diagnostics.errors());

    let locals = resolve(&statements, &mut diagnostics);
    (statements, locals, diagnostics)
}

fn resolution_errors(source: &str) -> Vec<ErrorImpl> {
    let (_, _, diagnostics) = resolve_source(source);
    diagnostics
        .errors()
        .iter()
        .map(|error| error.get_kind().clone())
        .collect()
}

/// Pulls the expression out of `print <expr>;` at `stmt`.
fn printed(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::Print(print) => &print.value,
        other => panic!("expected print statement, found {:?}", other),
    }
}

#[test]
fn test_globals_are_not_recorded() {
    let (_, locals, diagnostics) = resolve_source("var a = 1; print a; a = 2;");

    assert!(locals.is_empty());
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_local_distances() {
    let (statements, locals, _) = resolve_source(
        r#"
        {
            var a = 1;
            print a;
            {
                print a;
            }
        }
        "#,
    );

    let Stmt::Block(outer) = &statements[0] else {
        panic!("expected block");
    };
    let Expr::Variable(same_scope) = printed(&outer.body[1]) else {
        panic!("expected variable");
    };
    let Stmt::Block(inner) = &outer.body[2] else {
        panic!("expected inner block");
    };
    let Expr::Variable(nested) = printed(&inner.body[0]) else {
        panic!("expected variable");
    };

    assert_eq!(locals.get(&same_scope.id), Some(&0));
    assert_eq!(locals.get(&nested.id), Some(&1));
}

#[test]
fn test_parameters_share_scope_with_body() {
    let (statements, locals, _) = resolve_source("fun f(a) { print a; }");

    let Stmt::Function(function) = &statements[0] else {
        panic!("expected function");
    };
    let Expr::Variable(variable) = printed(&function.function.body[0]) else {
        panic!("expected variable");
    };

    assert_eq!(locals.get(&variable.id), Some(&0));
}

#[test]
fn test_assignment_is_resolved() {
    let (statements, locals, _) = resolve_source("{ var a; { a = 1; } }");

    let Stmt::Block(outer) = &statements[0] else {
        panic!("expected block");
    };
    let Stmt::Block(inner) = &outer.body[1] else {
        panic!("expected inner block");
    };
    let Stmt::Expression(expression) = &inner.body[0] else {
        panic!("expected expression statement");
    };
    let Expr::Assign(assign) = &expression.expression else {
        panic!("expected assignment");
    };

    assert_eq!(locals.get(&assign.id), Some(&1));
}

#[test]
fn test_self_referencing_initializer() {
    let (_, _, diagnostics) = resolve_source("var a = 1; { var a = a; }");

    assert_eq!(diagnostics.count(), 1);
    let error = &diagnostics.errors()[0];
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::SelfReferencingInitializer {
            variable: "a".to_string()
        }
    );
    assert_eq!(error.get_phase(), Phase::Resolution);
    assert_eq!(error.get_location(), &Location::Lexeme("a".to_string()));
}

#[test]
fn test_global_self_reference_is_allowed() {
    assert!(resolution_errors("var a = a;").is_empty());
}

#[test]
fn test_redeclaration_in_local_scope() {
    assert_eq!(
        resolution_errors("{ var a = 1; var a = 2; }"),
        vec![ErrorImpl::VariableAlreadyDeclared {
            variable: "a".to_string()
        }]
    );
    assert_eq!(
        resolution_errors("fun f(a, a) {}"),
        vec![ErrorImpl::VariableAlreadyDeclared {
            variable: "a".to_string()
        }]
    );
}

#[test]
fn test_redeclaration_in_global_scope_is_allowed() {
    assert!(resolution_errors("var a = 1; var a = 2;").is_empty());
}

#[test]
fn test_shadowing_in_nested_scope_is_allowed() {
    assert!(resolution_errors("{ var a = 1; { var a = 2; } }").is_empty());
}

#[test]
fn test_top_level_return() {
    let (_, _, diagnostics) = resolve_source("return 1;");

    assert_eq!(diagnostics.count(), 1);
    assert_eq!(diagnostics.errors()[0].get_kind(), &ErrorImpl::TopLevelReturn);
    assert_eq!(
        diagnostics.errors()[0].to_string(),
        "[line 1] Error at 'return': Can't return from top-level code"
    );
}

#[test]
fn test_return_inside_functions_is_allowed() {
    assert!(resolution_errors("fun f() { return 1; } var g = fun () { return; };").is_empty());
}

#[test]
fn test_return_after_function_is_reported() {
    assert_eq!(
        resolution_errors("fun f() { return 1; } return;"),
        vec![ErrorImpl::TopLevelReturn]
    );
}

#[test]
fn test_recursive_local_function() {
    let (statements, locals, diagnostics) =
        resolve_source("{ fun count(n) { if (n > 0) count(n - 1); } }");

    assert!(!diagnostics.has_errors());

    let Stmt::Block(block) = &statements[0] else {
        panic!("expected block");
    };
    let Stmt::Function(function) = &block.body[0] else {
        panic!("expected function");
    };
    let Stmt::If(if_stmt) = &function.function.body[0] else {
        panic!("expected if");
    };
    let Stmt::Expression(expression) = if_stmt.then_body.as_ref() else {
        panic!("expected expression statement");
    };
    let Expr::Call(call) = &expression.expression else {
        panic!("expected call");
    };
    let Expr::Variable(callee) = call.callee.as_ref() else {
        panic!("expected variable callee");
    };

    assert_eq!(locals.get(&callee.id), Some(&1));
}

#[test]
fn test_resolution_continues_after_error() {
    assert_eq!(
        resolution_errors("return; { var b = 1; var b = 2; } { var c = c; }"),
        vec![
            ErrorImpl::TopLevelReturn,
            ErrorImpl::VariableAlreadyDeclared {
                variable: "b".to_string()
            },
            ErrorImpl::SelfReferencingInitializer {
                variable: "c".to_string()
            },
        ]
    );
}
