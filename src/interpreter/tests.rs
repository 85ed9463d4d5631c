//! Unit tests for the interpreter module.
//!
//! Programs are run through the whole front end and their printed output is
//! captured with a `SharedBuffer`.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::{
    errors::{
        errors::{ErrorImpl, Location, Phase},
        reporter::{Diagnostics, ErrorReporter},
    },
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    parser::parser::parse,
    resolver::resolver::resolve,
    MK_TOKEN,
};

use super::{
    environment::Environment,
    interpreter::{Interpreter, SharedBuffer, MAX_CALL_DEPTH},
    value::Value,
};

fn run(source: &str) -> (Vec<String>, Diagnostics) {
    let output = SharedBuffer::new();
    let mut interpreter = Interpreter::with_output(Box::new(output.clone()));
    let mut diagnostics = Diagnostics::new(Some("test.lox".to_string()));

    let tokens = tokenize(source.to_string(), &mut diagnostics);
    let statements = parse(tokens, &mut diagnostics);
    let locals = resolve(&statements, &mut diagnostics);
    assert!(
        !diagnostics.has_static_errors(),
        "unexpected static errors: {:?}",
        diagnostics.errors()
    );

    interpreter.resolve(locals);
    interpreter.interpret(&statements, &mut diagnostics);

    (output.lines(), diagnostics)
}

fn output_of(source: &str) -> Vec<String> {
    let (output, diagnostics) = run(source);
    assert!(!diagnostics.has_errors(), "unexpected errors: {:?}", diagnostics.errors());
    output
}

fn runtime_error_of(source: &str) -> (Vec<String>, ErrorImpl) {
    let (output, diagnostics) = run(source);
    assert_eq!(diagnostics.count_phase(Phase::Runtime), 1);
    (output, diagnostics.errors()[0].get_kind().clone())
}

#[test]
fn test_print_arithmetic() {
    assert_eq!(output_of("print 1 + 2;"), vec!["3"]);
    assert_eq!(output_of("print 2 * 3 - 4 / 8;"), vec!["5.5"]);
    assert_eq!(output_of("print -(1 + 2);"), vec!["-3"]);
}

#[test]
fn test_remainder_is_floating_point() {
    assert_eq!(output_of("print 7 % 3;"), vec!["1"]);
    assert_eq!(output_of("print 5.5 % 2;"), vec!["1.5"]);
}

#[test]
fn test_value_rendering() {
    let output = output_of(
        r#"
        print nil;
        print true;
        print false;
        print "text";
        print 0.25;
        fun named() {}
        print named;
        print fun () {};
        print clock;
        "#,
    );

    assert_eq!(
        output,
        vec!["nil", "true", "false", "text", "0.25", "<fn named>", "<fn>", "<native fn>"]
    );
}

#[test]
fn test_string_concatenation() {
    assert_eq!(output_of(r#"print "foo" + "bar";"#), vec!["foobar"]);
}

#[test]
fn test_truthiness() {
    let output = output_of(
        r#"
        print !nil;
        print !false;
        print !0;
        print !"";
        "#,
    );

    assert_eq!(output, vec!["true", "true", "false", "false"]);
}

#[test]
fn test_equality() {
    let output = output_of(
        r#"
        print nil == nil;
        print nil == false;
        print 1 == 1;
        print "a" == "a";
        print "1" == 1;
        print 1 != 2;
        fun f() {}
        print f == f;
        "#,
    );

    assert_eq!(output, vec!["true", "false", "true", "true", "false", "true", "true"]);
}

#[test]
fn test_comparison() {
    let output = output_of("print 1 < 2; print 2 <= 2; print 1 > 2; print 3 >= 4;");

    assert_eq!(output, vec!["true", "true", "false", "false"]);
}

#[test]
fn test_logical_operators_short_circuit() {
    let output = output_of(
        r#"
        print nil or "x";
        print "first" or "second";
        print false and error_if_evaluated();
        print 1 and 2;
        "#,
    );

    assert_eq!(output, vec!["x", "first", "false", "2"]);
}

#[test]
fn test_variables_and_assignment() {
    let output = output_of(
        r#"
        var a;
        print a;
        a = 2;
        print a;
        var b = a = 3;
        print b;
        var a = "redefined";
        print a;
        "#,
    );

    assert_eq!(output, vec!["nil", "2", "3", "redefined"]);
}

#[test]
fn test_block_scoping() {
    let output = output_of(
        r#"
        var a = "global";
        {
            var a = "outer";
            {
                var a = "inner";
                print a;
            }
            print a;
        }
        print a;
        "#,
    );

    assert_eq!(output, vec!["inner", "outer", "global"]);
}

#[test]
fn test_if_else() {
    let output = output_of(
        r#"
        if (true) print "then"; else print "else";
        if (nil) print "then"; else print "else";
        if (false) print "skipped";
        "#,
    );

    assert_eq!(output, vec!["then", "else"]);
}

#[test]
fn test_while_loop() {
    let output = output_of(
        r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
        "#,
    );

    assert_eq!(output, vec!["0", "1", "2"]);
}

#[test]
fn test_for_loop() {
    let output = output_of("for (var i = 0; i < 3; i = i + 1) print i;");

    assert_eq!(output, vec!["0", "1", "2"]);
}

#[test]
fn test_function_return_values() {
    let output = output_of(
        r#"
        fun add(a, b) { return a + b; }
        fun nothing() { return; }
        fun implicit() {}
        print add(1, 2);
        print nothing();
        print implicit();
        "#,
    );

    assert_eq!(output, vec!["3", "nil", "nil"]);
}

#[test]
fn test_return_unwinds_nested_blocks_and_loops() {
    let output = output_of(
        r#"
        fun find() {
            var i = 0;
            while (true) {
                {
                    if (i == 3) return i;
                }
                i = i + 1;
            }
            print "unreachable";
        }
        print find();
        "#,
    );

    assert_eq!(output, vec!["3"]);
}

#[test]
fn test_recursion() {
    let output = output_of(
        r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
        "#,
    );

    assert_eq!(output, vec!["55"]);
}

#[test]
fn test_deep_recursion_below_limit() {
    let output = output_of(
        r#"
        fun count(n) {
            if (n > 0) return count(n - 1);
            return "done";
        }
        print count(900);
        "#,
    );

    assert_eq!(output, vec!["done"]);
}

#[test]
fn test_unbounded_recursion_is_runtime_error() {
    let output = SharedBuffer::new();
    let mut interpreter = Interpreter::with_output(Box::new(output.clone()));
    let mut diagnostics = Diagnostics::default();

    for source in ["fun f() { f(); }\nprint \"before\";\nf();", "print \"after\";"] {
        let tokens = tokenize(source.to_string(), &mut diagnostics);
        let statements = parse(tokens, &mut diagnostics);
        let locals = resolve(&statements, &mut diagnostics);
        interpreter.resolve(locals);
        interpreter.interpret(&statements, &mut diagnostics);
    }

    assert_eq!(output.lines(), vec!["before", "after"]);
    assert_eq!(diagnostics.count_phase(Phase::Runtime), 1);

    let error = &diagnostics.errors()[0];
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::StackOverflow {
            limit: MAX_CALL_DEPTH
        }
    );
    assert_eq!(error.get_location(), &Location::Lexeme(")".to_string()));
    assert_eq!(error.get_line(), 1);
    assert_eq!(interpreter.call_depth(), 0);
    assert!(Rc::ptr_eq(&interpreter.environment, interpreter.globals()));
}

#[test]
fn test_closures_share_captured_variable() {
    let output = output_of(
        r#"
        var inc;
        var get;
        fun counter() {
            var n = 0;
            fun increment() { n = n + 1; }
            fun current() { return n; }
            inc = increment;
            get = current;
        }
        counter();
        inc();
        inc();
        print get();
        "#,
    );

    assert_eq!(output, vec!["2"]);
}

#[test]
fn test_independent_counters() {
    let output = output_of(
        r#"
        fun make() {
            var n = 0;
            fun count() {
                n = n + 1;
                return n;
            }
            return count;
        }
        var first = make();
        var second = make();
        first();
        first();
        print first();
        print second();
        "#,
    );

    assert_eq!(output, vec!["3", "1"]);
}

#[test]
fn test_closure_binds_declaration_scope() {
    let output = output_of(
        r#"
        var a = "global";
        {
            fun show() { print a; }
            show();
            var a = "block";
            show();
        }
        "#,
    );

    assert_eq!(output, vec!["global", "global"]);
}

#[test]
fn test_anonymous_function() {
    let output = output_of(
        r#"
        var twice = fun (f, x) { return f(f(x)); };
        print twice(fun (n) { return n * 2; }, 3);
        "#,
    );

    assert_eq!(output, vec!["12"]);
}

#[test]
fn test_clock_returns_number() {
    let output = output_of("print clock() > 0;");

    assert_eq!(output, vec!["true"]);
}

#[test]
fn test_operand_type_errors() {
    let (_, error) = runtime_error_of("print -\"a\";");
    assert_eq!(error, ErrorImpl::OperandMustBeNumber);

    let (_, error) = runtime_error_of("print 1 < \"a\";");
    assert_eq!(error, ErrorImpl::OperandsMustBeNumbers);

    let (_, error) = runtime_error_of("print 1 + \"a\";");
    assert_eq!(error, ErrorImpl::InvalidAdditionOperands);
}

#[test]
fn test_addition_error_names_operator() {
    let (_, diagnostics) = run("print nil + 1;");

    let error = &diagnostics.errors()[0];
    assert_eq!(error.get_location(), &Location::Lexeme("+".to_string()));
    assert_eq!(
        error.to_string(),
        "[line 1] Error at '+': Operands must be two numbers or two strings"
    );
}

#[test]
fn test_undefined_variable() {
    let (_, error) = runtime_error_of("print missing;");
    assert_eq!(
        error,
        ErrorImpl::VariableNotDeclared {
            variable: "missing".to_string()
        }
    );

    let (_, error) = runtime_error_of("missing = 1;");
    assert_eq!(error.to_string(), "Undefined variable 'missing'");
}

#[test]
fn test_calling_non_callable() {
    let (_, error) = runtime_error_of("\"not a function\"();");
    assert_eq!(error, ErrorImpl::NotCallable);
}

#[test]
fn test_arity_mismatch_does_not_run_body() {
    let (output, diagnostics) = run(
        r#"
        fun f() { print "body"; }
        f(1);
        "#,
    );

    assert!(output.is_empty());
    assert_eq!(diagnostics.count(), 1);

    let error = &diagnostics.errors()[0];
    assert_eq!(
        error.get_kind(),
        &ErrorImpl::UnexpectedArguments {
            expected: 0,
            received: 1
        }
    );
    assert_eq!(error.get_location(), &Location::Lexeme(")".to_string()));
    assert_eq!(error.get_line(), 3);
}

#[test]
fn test_arguments_evaluated_before_arity_check() {
    let (output, _) = run(
        r#"
        fun noisy() { print "evaluated"; return 1; }
        fun f(a) {}
        f(noisy(), noisy());
        "#,
    );

    assert_eq!(output, vec!["evaluated", "evaluated"]);
}

#[test]
fn test_runtime_error_aborts_remaining_statements() {
    let (output, diagnostics) = run(
        r#"
        print "before";
        print 1 - nil;
        print "after";
        "#,
    );

    assert_eq!(output, vec!["before"]);
    assert!(diagnostics.has_runtime_error());
}

#[test]
fn test_runtime_error_restores_environment() {
    let output = SharedBuffer::new();
    let mut interpreter = Interpreter::with_output(Box::new(output.clone()));
    let mut diagnostics = Diagnostics::default();

    for source in ["var a = \"global\";", "{ var a = \"local\"; print -a; }", "print a;"] {
        let tokens = tokenize(source.to_string(), &mut diagnostics);
        let statements = parse(tokens, &mut diagnostics);
        let locals = resolve(&statements, &mut diagnostics);
        interpreter.resolve(locals);
        interpreter.interpret(&statements, &mut diagnostics);
    }

    assert_eq!(output.lines(), vec!["global"]);
    assert_eq!(diagnostics.count_phase(Phase::Runtime), 1);
    assert!(Rc::ptr_eq(&interpreter.environment, interpreter.globals()));
}

#[test]
fn test_globals_persist_between_runs() {
    let output = SharedBuffer::new();
    let mut interpreter = Interpreter::with_output(Box::new(output.clone()));
    let mut diagnostics = Diagnostics::default();

    let sources = [
        "fun make() { var n = 10; fun get() { return n; } return get; }",
        "var get = make();",
        "print get();",
    ];
    for source in sources {
        let tokens = tokenize(source.to_string(), &mut diagnostics);
        let statements = parse(tokens, &mut diagnostics);
        let locals = resolve(&statements, &mut diagnostics);
        interpreter.resolve(locals);
        interpreter.interpret(&statements, &mut diagnostics);
    }

    assert!(!diagnostics.has_errors());
    assert_eq!(output.lines(), vec!["10"]);
}

#[test]
fn test_environment_chain() {
    let name = MK_TOKEN!(TokenKind::Identifier, "x".to_string(), None, 1);

    let globals = Environment::new().into_shared();
    globals.borrow_mut().define("x", Value::Number(1.0));

    let child = Environment::with_enclosing(Rc::clone(&globals)).into_shared();
    assert_eq!(child.borrow().get(&name), Ok(Value::Number(1.0)));

    child.borrow_mut().assign(&name, Value::Number(2.0)).unwrap();
    assert_eq!(globals.borrow().get(&name), Ok(Value::Number(2.0)));
    assert!(!child.borrow().contains("x"));

    assert_eq!(Environment::get_at(&child, 1, &name), Ok(Value::Number(2.0)));
    assert!(Environment::get_at(&child, 0, &name).is_err());
    assert!(Environment::ancestor(&child, 2).is_none());

    Environment::assign_at(&child, 1, &name, Value::from("three")).unwrap();
    assert_eq!(globals.borrow().get(&name), Ok(Value::from("three")));
}

#[test]
fn test_undefined_lookup_in_environment() {
    let name = MK_TOKEN!(TokenKind::Identifier, "ghost".to_string(), None, 4);
    let environment = Environment::new();

    let error = environment.get(&name).unwrap_err();
    assert_eq!(error.to_string(), "[line 4] Error at 'ghost': Undefined variable 'ghost'");
}

#[test]
fn test_custom_reporter_receives_runtime_error() {
    #[derive(Default)]
    struct Lines(Vec<usize>);

    impl ErrorReporter for Lines {
        fn report(&mut self, error: crate::errors::errors::Error) {
            self.0.push(error.get_line());
        }
    }

    let mut interpreter = Interpreter::with_output(Box::new(SharedBuffer::new()));
    let mut diagnostics = Diagnostics::default();
    let tokens = tokenize("print 1;\nprint nil * 2;".to_string(), &mut diagnostics);
    let statements = parse(tokens, &mut diagnostics);

    let mut lines = Lines::default();
    assert!(!interpreter.interpret(&statements, &mut lines));
    assert_eq!(lines.0, vec![2]);
}
