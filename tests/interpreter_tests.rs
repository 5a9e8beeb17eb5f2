// Evaluation tests: binding rules, operator typing, rendering, and the
// lazy output stream.

use verso::ast::{Declaration, Modifier, StaticNode};
use verso::error::ErrorKind;
use verso::interpreter::Interpreter;
use verso::lexer::Lexer;
use verso::parser::Parser;
use verso::runner;
use verso::value::{PrimType, Value};
use verso::VersionProvider;

fn execute(source: &str, version: &str) -> Vec<String> {
    runner::execute(source, version).expect("program should run")
}

fn execute_err(source: &str, version: &str) -> verso::VersoError {
    runner::execute(source, version).expect_err("program should fail")
}

#[test]
fn initializer_expression_updates_the_environment() {
    // let a: Number = 1 + 2; prints nothing and leaves a = 3
    let provider = VersionProvider::new();
    let bundle = provider.resolve("1.0").unwrap();
    let lexer = Lexer::new(bundle.lexer_rules(), "let a: Number = 1 + 2;");
    let parser = Parser::new(lexer, bundle);
    let mut interpreter = Interpreter::new(parser, bundle);

    let output = interpreter.run().expect("program should run");
    assert!(output.is_empty());

    let binding = interpreter.environment().get("a").expect("a is bound");
    assert_eq!(binding.ty, PrimType::Number);
    assert_eq!(binding.value, Some(Value::Number(3.0)));
    assert!(binding.mutable);
}

#[test]
fn reassignment_reads_the_previous_value() {
    let output = execute("let a: Number = 5; a = 1 * a; println(a);", "1.0");
    assert_eq!(output, vec!["5"]);
}

#[test]
fn sum_with_a_string_operand_concatenates() {
    let output = execute("let a: String = 5 + '5'; println(a);", "1.0");
    assert_eq!(output, vec!["55"]);

    let output = execute("println('v' + 1.5);", "1.0");
    assert_eq!(output, vec!["v1.5"]);
}

#[test]
fn whole_numbers_print_without_a_trailing_decimal() {
    let output = execute("println(6 / 2); println(7 / 2); println(2.0 + 1.0);", "1.0");
    assert_eq!(output, vec!["3", "3.5", "3"]);
}

#[test]
fn booleans_print_as_words() {
    let output = execute("let f: Boolean = false; println(f); println(true);", "1.1");
    assert_eq!(output, vec!["false", "true"]);
}

#[test]
fn arithmetic_follows_precedence() {
    let output = execute("println(1 + 2 * 3 - 8 / 4);", "1.0");
    assert_eq!(output, vec!["5"]);
}

#[test]
fn division_by_zero_is_an_arithmetic_error() {
    let error = execute_err("let a: Number = 1 / 0;", "1.0");
    assert_eq!(error.kind, ErrorKind::Arithmetic);
    assert!(error.message.contains("Division by zero"));
}

#[test]
fn initializing_with_a_mismatched_type_names_both_types() {
    let error = execute_err("let a: String = 5;", "1.0");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains("String"), "message: {}", error.message);
    assert!(error.message.contains("Number"), "message: {}", error.message);
}

#[test]
fn reassigning_with_a_mismatched_type_names_both_types() {
    let error = execute_err("let a: Number = 1; a = 'x';", "1.0");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains("Number"));
    assert!(error.message.contains("String"));
}

#[test]
fn immutable_bindings_reject_reassignment() {
    let error = execute_err("val a: Number = 1; a = 2; println(a);", "1.0");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains("immutable"));
    assert!(error.message.contains('a'));

    // The failing statement produced no output line
    let provider = VersionProvider::new();
    let bundle = provider.resolve("1.0").unwrap();
    let lexer = Lexer::new(bundle.lexer_rules(), "val a: Number = 1; a = 2; println(a);");
    let parser = Parser::new(lexer, bundle);
    let mut interpreter = Interpreter::new(parser, bundle);
    let first = interpreter.next().expect("something must surface");
    assert!(first.is_err());
    assert!(interpreter.next().is_none());
}

#[test]
fn mutability_is_checked_before_the_right_hand_side() {
    // The mutability violation wins over the undefined variable on the RHS
    let error = execute_err("val a: Number = 1; a = nonsense;", "1.0");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains("immutable"));
}

#[test]
fn var_bindings_stay_mutable() {
    let output = execute("var a: Number = 1; a = 2; println(a);", "1.0");
    assert_eq!(output, vec!["2"]);
}

#[test]
fn subtraction_rejects_non_numbers() {
    let error = execute_err("let a: Number = 1 - 'x';", "1.0");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains('-'));
    assert!(error.message.contains("String"));
}

#[test]
fn sum_rejects_boolean_operands_on_either_side() {
    let error = execute_err("let a: Boolean = true; let b: String = a + 'x';", "1.1");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains("Boolean"));

    let error = execute_err("let a: Boolean = true; let b: String = 'x' + a;", "1.1");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains("Boolean"));
}

#[test]
fn multiplication_rejects_boolean_operands() {
    let error = execute_err("let a: Boolean = true; let b: Number = 1 * a;", "1.1");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains('*'));
    assert!(error.message.contains("Boolean"));
}

#[test]
fn undefined_variables_are_reference_errors() {
    let error = execute_err("println(x);", "1.0");
    assert_eq!(error.kind, ErrorKind::Reference);
    assert!(error.message.contains('x'));

    let error = execute_err("x = 1;", "1.0");
    assert_eq!(error.kind, ErrorKind::Reference);
}

#[test]
fn uninitialized_variables_cannot_be_read() {
    let error = execute_err("let a: Number; println(a);", "1.0");
    assert_eq!(error.kind, ErrorKind::Reference);
    assert!(error.message.contains("no value"));
}

#[test]
fn redeclaration_overwrites_the_previous_binding() {
    let output = execute("let a: Number = 1; let a: String = 'x'; println(a);", "1.0");
    assert_eq!(output, vec!["x"]);
}

#[test]
fn output_before_a_failing_statement_is_preserved() {
    let provider = VersionProvider::new();
    let bundle = provider.resolve("1.0").unwrap();
    let lexer = Lexer::new(bundle.lexer_rules(), "println(1); println(missing);");
    let parser = Parser::new(lexer, bundle);
    let mut interpreter = Interpreter::new(parser, bundle);

    let first = interpreter.next().expect("first line");
    assert_eq!(first.unwrap(), "1");
    let second = interpreter.next().expect("second pull surfaces the error");
    assert!(second.is_err());
    assert!(interpreter.next().is_none(), "interpreter fuses after an error");
}

#[test]
fn declaring_a_type_outside_the_version_is_rejected() {
    // Reachable only through a hand-built AST: version 1.0 has no Boolean
    let provider = VersionProvider::new();
    let bundle = provider.resolve("1.0").unwrap();
    let nodes = vec![Ok(StaticNode::Declaration(Declaration {
        modifier: Modifier::new("let", true),
        ty: PrimType::Boolean,
        name: "a".to_string(),
    }))];
    let mut interpreter = Interpreter::new(nodes.into_iter(), bundle);

    let error = interpreter.run().expect_err("declaration should fail");
    assert_eq!(error.kind, ErrorKind::Type);
    assert!(error.message.contains("1.0"));
    assert!(error.message.contains("Boolean"));
}

#[test]
fn repeated_evaluation_of_the_same_node_is_stable() {
    // Evaluation is pure: re-running a node against the same environment
    // yields the same value
    let nodes = runner::validate("let a: Number = 2 * 3;", "1.0").unwrap();
    let StaticNode::Assignation { value, .. } = &nodes[0] else {
        panic!("expected an assignation");
    };
    let environment = verso::Environment::new();
    let first = verso::evaluate(value, &environment).unwrap();
    let second = verso::evaluate(value, &environment).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Value::Number(6.0));
}
