//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable and function declarations
//! - Overload grouping
//! - Expressions and operator precedence
//! - Indentation driven nesting
//! - Control flow, classes, imports and file types

use std::{collections::HashSet, rc::Rc};

use rstest::rstest;

use crate::ast::ast::{Ast, NodeId};
use crate::ast::nodes::{ImportSymbols, NodeKind, NumberLiteral};
use crate::ast::types::{BuiltinType, Type};
use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::ErrorImpl;
use crate::lexer::lexer::tokenize;
use crate::lexer::stream::{TokenSource, TokenStream};
use crate::lexer::tokens::{Token, TokenKind};
use crate::type_checker::type_checker::declaration_of;

use super::parser::{parse, LineOutcome, Parser};

fn parse_source(source: &str) -> (Ast, Diagnostics) {
    let tokens = tokenize(source.to_string(), Some("test.em".to_string())).unwrap();
    parse(tokens, Rc::new("test.em".to_string()), "Test")
}

fn parse_clean(source: &str) -> Ast {
    let (ast, diagnostics) = parse_source(source);
    let messages: Vec<String> = diagnostics.iter().map(|error| error.to_string()).collect();
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", messages);
    ast
}

/// Renders an expression subtree as an s-expression.
fn render(ast: &Ast, id: NodeId) -> String {
    let children: Vec<String> = ast
        .children(id)
        .iter()
        .map(|child| render(ast, *child))
        .collect();

    match ast.kind(id) {
        NodeKind::Number(NumberLiteral::Int(value)) => value.to_string(),
        NodeKind::Number(NumberLiteral::Double(value)) => value.to_string(),
        NodeKind::String(value) => format!("{:?}", value),
        NodeKind::VariableUsage { .. } => ast.name(id).to_string(),
        NodeKind::MemberAccess => format!("(. {} {})", children[0], ast.name(id)),
        NodeKind::Operator { operator } => format!("({} {})", operator, children.join(" ")),
        NodeKind::FunctionCall => format!("(call {})", children.join(" ")),
        other => other.describe().to_string(),
    }
}

fn first_statement(ast: &Ast) -> NodeId {
    ast.children(ast.root())[0]
}

fn declared_type(ast: &Ast, id: NodeId) -> Option<Type> {
    match ast.kind(id) {
        NodeKind::VariableDeclaration { ty } => *ty,
        other => panic!("expected a variable declaration, found {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let ast = parse_clean("var x: int = 42");
    let x = first_statement(&ast);

    assert_eq!(ast.name(x), "x");
    assert_eq!(declared_type(&ast, x), Some(Type::INT));
    assert_eq!(render(&ast, ast.children(x)[0]), "42");
}

#[test]
fn test_var_keyword_is_optional() {
    let ast = parse_clean("x: int = 42");
    let x = first_statement(&ast);

    assert_eq!(ast.name(x), "x");
    assert_eq!(declared_type(&ast, x), Some(Type::INT));
}

#[rstest]
#[case("x: = 1.5", Type::DOUBLE)]
#[case("var s: = \"hi\"", Type::STRING)]
#[case("var b: = 1 < 2", Type::BOOL)]
#[case("var n: = 1 + 2 * 3", Type::INT)]
fn test_variable_type_inferred_from_initializer(#[case] source: &str, #[case] expected: Type) {
    let ast = parse_clean(source);

    assert_eq!(declared_type(&ast, first_statement(&ast)), Some(expected));
}

#[test]
fn test_type_mismatch_keeps_declared_type() {
    let (ast, diagnostics) = parse_source("var x: int = \"hello\"");
    let x = first_statement(&ast);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(
        error,
        ErrorImpl::TypeMatchError { expected, received } if expected == "int" && received == "string"
    )));
    assert_eq!(declared_type(&ast, x), Some(Type::INT));
    assert!(matches!(ast.kind(ast.children(x)[0]), NodeKind::String(_)));
}

#[test]
fn test_unknown_type_annotation() {
    let (ast, diagnostics) = parse_source("var p: Point");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::UnknownType { type_ } if type_ == "Point")));
    assert_eq!(declared_type(&ast, first_statement(&ast)), None);
}

#[test]
fn test_variable_without_type_or_value() {
    let (ast, diagnostics) = parse_source("x:");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::UnresolvedType { .. })));
    assert_eq!(ast.children(ast.root()).len(), 1);
}

#[test]
fn test_variable_redeclared_in_same_scope() {
    let (ast, diagnostics) = parse_source("var x: int\nvar x: int");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::VariableAlreadyDeclared { .. })));
    assert_eq!(ast.children(ast.root()).len(), 2);
}

#[test]
fn test_shadowing_in_nested_scope_is_allowed() {
    let ast = parse_clean("var x: int\nif 1\n    var x: string");

    assert_eq!(ast.children(ast.root()).len(), 2);
}

#[rstest]
#[case("1 + 2 * 3", "(+ 1 (* 2 3))")]
#[case("1 * 2 + 3", "(+ (* 1 2) 3)")]
#[case("1 - 2 - 3", "(- (- 1 2) 3)")]
#[case("8 / 4 % 3", "(% (/ 8 4) 3)")]
#[case("(1 + 2) * 3", "(* (+ 1 2) 3)")]
#[case("a = b + 1", "(= a (+ b 1))")]
#[case("1 < 2 == 3 < 4", "(== (< 1 2) (< 3 4))")]
#[case("a + 1 >= b * 2", "(>= (+ a 1) (* b 2))")]
#[case("a.b.c", "(. (. a b) c)")]
#[case("a.b + c.d", "(+ (. a b) (. c d))")]
#[case("x++", "(++ x)")]
#[case("a + b--", "(+ a (-- b))")]
#[case("1.5 * 2", "(* 1.5 2)")]
fn test_operator_precedence(#[case] source: &str, #[case] expected: &str) {
    let ast = parse_clean(source);

    assert_eq!(render(&ast, first_statement(&ast)), expected);
}

#[rstest]
#[case("a.b c", "(call (. a b) c)")]
#[case("f x y", "(call f x y)")]
#[case("f x.y (1 + 2)", "(call f (. x y) (+ 1 2))")]
#[case("f ()", "(call f)")]
#[case("f x + 1", "(+ (call f x) 1)")]
#[case("f \"hi\" 2", "(call f \"hi\" 2)")]
#[case("a = f x", "(= a (call f x))")]
fn test_juxtaposition_calls(#[case] source: &str, #[case] expected: &str) {
    let ast = parse_clean(source);

    assert_eq!(render(&ast, first_statement(&ast)), expected);
}

#[rstest]
#[case("a && b")]
#[case("a || b")]
#[case("!a")]
fn test_operator_outside_precedence_table(#[case] source: &str) {
    let (ast, diagnostics) = parse_source(source);

    assert!(ast.children(ast.root()).is_empty());
    assert!(diagnostics.has_structural());
}

#[test]
fn test_unknown_operator_diagnostic() {
    let (_, diagnostics) = parse_source("a && b");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::UnknownOperator { operator } if operator == "&&")));
}

#[rstest]
#[case("(1 + 2")]
#[case("1 + 2)")]
#[case("f (x")]
fn test_unmatched_parenthesis(#[case] source: &str) {
    let (ast, diagnostics) = parse_source(source);

    assert!(ast.children(ast.root()).is_empty());
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::UnmatchedParenthesis)));
}

#[test]
fn test_structural_error_skips_only_its_line() {
    let (ast, diagnostics) = parse_source("1 2\nvar y: int = 1");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_structural());
    let y = first_statement(&ast);
    assert_eq!(ast.name(y), "y");
}

#[test]
fn test_parse_function_declaration() {
    let ast = parse_clean("area: (w, h: int) -> int => w * h");
    let wrapper = first_statement(&ast);

    assert_eq!(ast.name(wrapper), "area");
    assert_eq!(declared_type(&ast, wrapper), Some(Type::FUNCTION));

    let function = ast.function_of(wrapper).unwrap();
    assert!(matches!(
        ast.kind(function),
        NodeKind::FunctionDeclaration { return_type: Type::INT, params: 2 }
    ));

    let params = ast.params(function);
    assert_eq!(ast.name(params[0]), "w");
    assert_eq!(declared_type(&ast, params[0]), Some(Type::INT));
    assert_eq!(declared_type(&ast, params[1]), Some(Type::INT));

    let body = ast.body(function);
    assert_eq!(body.len(), 1);
    assert!(matches!(ast.kind(body[0]), NodeKind::ReturnExpression));
    let product = ast.children(body[0])[0];
    assert_eq!(render(&ast, product), "(* w h)");
    assert_eq!(declaration_of(&ast, ast.children(product)[0]), Some(params[0]));
}

#[test]
fn test_parameter_backfill_from_next_annotation() {
    let ast = parse_clean("f: (a, b: int, c, d: string) -> int");
    let function = ast.function_of(first_statement(&ast)).unwrap();

    let types: Vec<Option<Type>> = ast
        .params(function)
        .iter()
        .map(|param| declared_type(&ast, *param))
        .collect();
    assert_eq!(
        types,
        vec![
            Some(Type::INT),
            Some(Type::INT),
            Some(Type::STRING),
            Some(Type::STRING)
        ]
    );
}

#[test]
fn test_parameter_backfill_from_return_type() {
    let ast = parse_clean("f: (a, b) -> double");
    let function = ast.function_of(first_statement(&ast)).unwrap();

    for param in ast.params(function) {
        assert_eq!(declared_type(&ast, *param), Some(Type::DOUBLE));
    }
}

#[test]
fn test_parameter_backfill_from_expression_body() {
    let ast = parse_clean("f: (a) => \"text\"");
    let function = ast.function_of(first_statement(&ast)).unwrap();

    assert_eq!(declared_type(&ast, ast.params(function)[0]), Some(Type::STRING));
    assert!(matches!(
        ast.kind(function),
        NodeKind::FunctionDeclaration { return_type: Type::STRING, .. }
    ));
}

#[test]
fn test_untyped_parameter_is_reported() {
    let (ast, diagnostics) = parse_source("f: (a)");
    let function = ast.function_of(first_statement(&ast)).unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::UntypedParameter { parameter } if parameter == "a")));
    assert_eq!(declared_type(&ast, ast.params(function)[0]), None);
}

#[test]
fn test_function_defaults_to_void() {
    let ast = parse_clean("main: ()");
    let function = ast.function_of(first_statement(&ast)).unwrap();

    assert!(matches!(
        ast.kind(function),
        NodeKind::FunctionDeclaration { return_type: Type::VOID, params: 0 }
    ));
}

#[test]
fn test_function_body_by_indentation() {
    let ast = parse_clean("f: (a: int) -> int\n    var b: int = a\n    return b\nvar x: int = 1");
    let root = ast.root();
    let function = ast.function_of(ast.children(root)[0]).unwrap();

    let body = ast.body(function);
    assert_eq!(body.len(), 2);
    assert_eq!(ast.name(body[0]), "b");
    assert!(matches!(ast.kind(body[1]), NodeKind::ReturnExpression));

    let usage = ast.children(body[0])[0];
    assert_eq!(declaration_of(&ast, usage), Some(ast.params(function)[0]));

    assert_eq!(ast.children(root).len(), 2);
    assert_eq!(ast.name(ast.children(root)[1]), "x");
}

#[test]
fn test_overloads_are_grouped() {
    let ast = parse_clean("f: (a: int)\nf: (a: string)");
    let root = ast.root();

    assert_eq!(ast.children(root).len(), 1);
    let group = ast.children(root)[0];
    assert!(matches!(ast.kind(group), NodeKind::FunctionGroup));
    assert_eq!(ast.name(group), "f");

    let members = ast.children(group);
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|member| ast.is_function_variable(*member)));
    assert!(members.iter().all(|member| ast.parent(*member) == Some(group)));
    assert!(!ast.children(root).contains(&members[0]));
    assert!(!ast.children(root).contains(&members[1]));
}

#[test]
fn test_group_keeps_position_among_siblings() {
    let ast = parse_clean("f: (a: int)\nvar x: int = 1\nf: (a: string)");
    let root = ast.root();

    assert_eq!(ast.children(root).len(), 2);
    assert!(matches!(ast.kind(ast.children(root)[0]), NodeKind::FunctionGroup));
    assert_eq!(ast.name(ast.children(root)[1]), "x");
}

#[test]
fn test_third_overload_joins_group() {
    let ast = parse_clean("f: (a: int)\nf: (a: string)\nf: (a: int, b: int)");
    let group = first_statement(&ast);

    assert_eq!(ast.children(group).len(), 3);
}

#[test]
fn test_overload_body_nests_into_function() {
    let ast = parse_clean("f: (a: int)\nf: (a: string)\n    return a\nvar x: int = 1");
    let root = ast.root();
    let group = ast.children(root)[0];
    let second = ast.function_of(ast.children(group)[1]).unwrap();

    assert_eq!(ast.body(second).len(), 1);
    assert_eq!(ast.children(root).len(), 2);
}

#[rstest]
#[case("f: (a: int)\nf: (b: int)", 1)]
#[case("f: (a: int)\nf: (a: string)\nf: (x: int)", 2)]
fn test_duplicate_overload_is_discarded(#[case] source: &str, #[case] expected_members: usize) {
    let (ast, diagnostics) = parse_source(source);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::DuplicateOverload { .. })));
    assert_eq!(ast.children(ast.root()).len(), 1);

    let first = first_statement(&ast);
    let members = match ast.kind(first) {
        NodeKind::FunctionGroup => ast.children(first).len(),
        _ => 1,
    };
    assert_eq!(members, expected_members);
}

#[test]
fn test_function_name_collision() {
    let (ast, diagnostics) = parse_source("var f: int = 1\nf: (a: int)");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::NameCollision { name } if name == "f")));
    assert_eq!(ast.children(ast.root()).len(), 1);
    assert_eq!(declared_type(&ast, first_statement(&ast)), Some(Type::INT));
}

fn root_names(ast: &Ast) -> Vec<&str> {
    ast.children(ast.root())
        .iter()
        .map(|id| ast.name(*id))
        .collect()
}

#[test]
fn test_duplicate_overload_drops_its_body() {
    let (ast, diagnostics) = parse_source(
        "f: (a: int) -> int\n    return a\nf: (b: int) -> int\n    return 99\nvar x: int = 1",
    );

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::DuplicateOverload { .. })));
    assert_eq!(root_names(&ast), vec!["f", "x"]);

    let function = ast.function_of(first_statement(&ast)).unwrap();
    let body = ast.body(function);
    assert_eq!(body.len(), 1);
    assert_eq!(render(&ast, ast.children(body[0])[0]), "a");
}

#[test]
fn test_name_collision_drops_its_body() {
    let (ast, diagnostics) =
        parse_source("var f: int = 1\nf: (a: int) -> int\n    return a\nvar g: int = 2");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::NameCollision { .. })));
    assert_eq!(root_names(&ast), vec!["f", "g"]);
    assert_eq!(ast.children(first_statement(&ast)).len(), 1);
}

#[test]
fn test_rejected_line_inside_block_keeps_siblings() {
    let (ast, diagnostics) = parse_source(
        "if 1\n    f: (a: int)\n    f: (a: int)\n        return 1\n    var x: int = 1",
    );

    assert_eq!(diagnostics.len(), 1);
    let branch = first_statement(&ast);
    let body: Vec<&str> = ast.body(branch).iter().map(|id| ast.name(*id)).collect();
    assert_eq!(body, vec!["f", "x"]);

    let function = ast.function_of(ast.body(branch)[0]).unwrap();
    assert!(ast.body(function).is_empty());
}

#[test]
fn test_header_error_drops_its_body() {
    let (ast, diagnostics) =
        parse_source("if 1\n    var a: int = 1\nif (2\n    var b: int = 2\nvar c: int = 3");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::UnmatchedParenthesis)));
    assert_eq!(ast.children(ast.root()).len(), 2);

    let branch = first_statement(&ast);
    let body: Vec<&str> = ast.body(branch).iter().map(|id| ast.name(*id)).collect();
    assert_eq!(body, vec!["a"]);
    assert_eq!(ast.name(ast.children(ast.root())[1]), "c");
}

#[test]
fn test_call_type_comes_from_return_type() {
    let (_, diagnostics) = parse_source("name: () -> string\nvar s: string = name ()\nvar n: int = name ()");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::TypeMatchError { .. })));
}

#[test]
fn test_equality_sides_are_compared() {
    let (ast, diagnostics) = parse_source("var a: int = 1\nvar b: string = \"s\"\na == b");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::TypeMatchError { .. })));
    assert_eq!(ast.children(ast.root()).len(), 3);
}

#[test]
fn test_indented_line_becomes_child() {
    let ast = parse_clean("if 1\n    var a: int = 1\n    var b: int = 2\nvar c: int = 3");
    let root = ast.root();
    let branch = ast.children(root)[0];

    assert!(matches!(ast.kind(branch), NodeKind::If));
    assert_eq!(render(&ast, ast.children(branch)[0]), "1");
    assert_eq!(ast.body(branch).len(), 2);
    assert_eq!(ast.children(root).len(), 2);
}

#[test]
fn test_dedent_returns_to_block_sibling() {
    let ast = parse_clean("if 1\n    if 2\n        var a: int = 1\n    var b: int = 2\nvar c: int = 3");
    let root = ast.root();
    let outer = ast.children(root)[0];
    let inner = ast.body(outer)[0];

    assert_eq!(ast.body(inner).len(), 1);
    assert_eq!(ast.body(outer).len(), 2);
    assert_eq!(ast.name(ast.body(outer)[1]), "b");
    assert_eq!(ast.name(ast.children(root)[1]), "c");
}

#[test]
fn test_dedent_across_several_levels() {
    let ast = parse_clean("if 1\n    if 2\n        if 3\n            var a: int = 1\nvar b: int = 2");
    let root = ast.root();

    assert_eq!(ast.children(root).len(), 2);
    assert_eq!(ast.name(ast.children(root)[1]), "b");
}

#[test]
fn test_blank_and_comment_lines_do_not_close_blocks() {
    let ast = parse_clean("if 1\n    var a: int = 1\n\n// note\n    var b: int = 2");
    let branch = first_statement(&ast);

    assert_eq!(ast.body(branch).len(), 2);
}

#[test]
fn test_non_block_cannot_own_indented_lines() {
    let (ast, diagnostics) = parse_source("var x: int = 1\n    var y: int = 2");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::CannotOwnBlock { .. })));
    assert_eq!(ast.children(ast.root()).len(), 1);
}

#[test]
fn test_if_else() {
    let ast = parse_clean("if 1 < 2\n    var a: int = 1\nelse\n    var b: int = 2");
    let root = ast.root();

    assert_eq!(ast.children(root).len(), 2);
    let otherwise = ast.children(root)[1];
    assert!(matches!(ast.kind(otherwise), NodeKind::Else));
    assert_eq!(ast.name(ast.body(otherwise)[0]), "b");
}

#[test]
fn test_else_without_if() {
    let (ast, diagnostics) = parse_source("var a: int = 1\nelse");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::ElseWithoutIf)));
    assert_eq!(ast.children(ast.root()).len(), 1);
}

#[test]
fn test_bare_loop_is_desugared() {
    let ast = parse_clean("loop 5");
    let node = first_statement(&ast);

    assert!(matches!(ast.kind(node), NodeKind::Loop { desugared: true }));
    let header = ast.children(node);
    assert_eq!(header.len(), 3);

    let counter = header[0];
    assert!(ast.name(counter).starts_with('$'));
    assert_eq!(declared_type(&ast, counter), Some(Type::INT));
    assert_eq!(render(&ast, ast.children(counter)[0]), "5");

    let name = ast.name(counter);
    assert_eq!(render(&ast, header[1]), format!("(> {} 0)", name));
    assert_eq!(render(&ast, header[2]), format!("(-- {})", name));
    assert_eq!(declaration_of(&ast, ast.children(header[1])[0]), Some(counter));
    assert_eq!(declaration_of(&ast, ast.children(header[2])[0]), Some(counter));
}

#[test]
fn test_bare_loop_counters_are_unique() {
    let ast = parse_clean("loop 2\nloop 3");
    let root = ast.root();
    let first = ast.children(ast.children(root)[0])[0];
    let second = ast.children(ast.children(root)[1])[0];

    assert_ne!(ast.name(first), ast.name(second));
}

#[test]
fn test_bare_loop_over_integer_variable() {
    let ast = parse_clean("var n: int = 3\nloop n\n    n");
    let node = ast.children(ast.root())[1];

    assert!(matches!(ast.kind(node), NodeKind::Loop { desugared: true }));
    assert_eq!(ast.body(node).len(), 1);
}

#[rstest]
#[case("loop \"x\"", "string")]
#[case("var d: double = 1.5\nloop d", "double")]
fn test_bare_loop_rejects_non_integer(#[case] source: &str, #[case] received_type: &str) {
    let (ast, diagnostics) = parse_source(source);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(
        error,
        ErrorImpl::BareLoopNotInteger { received } if received == received_type
    )));
    assert!(ast
        .descendants(ast.root())
        .iter()
        .all(|id| !matches!(ast.kind(*id), NodeKind::Loop { .. })));
}

#[test]
fn test_rejected_bare_loop_drops_its_body() {
    let (ast, diagnostics) = parse_source(
        "loop 3\n    x: int = 1\nloop \"x\"\n    y: int = 2\n        z: int = 3\nvar w: int = 4",
    );

    assert_eq!(diagnostics.len(), 1);
    let first = first_statement(&ast);
    let body: Vec<&str> = ast.body(first).iter().map(|id| ast.name(*id)).collect();
    assert_eq!(body, vec!["x"]);
    assert_eq!(ast.children(ast.root()).len(), 2);
    assert_eq!(ast.name(ast.children(ast.root())[1]), "w");
}

#[test]
fn test_counted_loop_keeps_integral_type() {
    let ast = parse_clean("var n: long\nloop n");
    let node = ast.children(ast.root())[1];
    let counter = ast.children(node)[0];

    assert_eq!(
        declared_type(&ast, counter),
        Some(Type::Builtin(BuiltinType::Long))
    );
}

#[test]
fn test_explicit_loop() {
    let ast = parse_clean("loop i: int = 0, i < 10, i++\n    i");
    let node = first_statement(&ast);

    assert!(matches!(ast.kind(node), NodeKind::Loop { desugared: false }));
    let header = ast.children(node);
    assert_eq!(ast.name(header[0]), "i");
    assert_eq!(render(&ast, header[1]), "(< i 10)");
    assert_eq!(render(&ast, header[2]), "(++ i)");
    assert_eq!(declaration_of(&ast, ast.children(header[1])[0]), Some(header[0]));
    assert_eq!(ast.body(node).len(), 1);
}

#[test]
fn test_explicit_loop_missing_iteration() {
    let (ast, diagnostics) = parse_source("loop i: int = 0, i < 10");

    assert!(diagnostics.has_structural());
    assert!(ast.children(ast.root()).is_empty());
}

#[test]
fn test_return_statement() {
    let ast = parse_clean("f: () -> int\n    return 1\ng: ()\n    return");
    let root = ast.root();
    let f = ast.function_of(ast.children(root)[0]).unwrap();
    let g = ast.function_of(ast.children(root)[1]).unwrap();

    assert_eq!(ast.children(ast.body(f)[0]).len(), 1);
    assert!(ast.children(ast.body(g)[0]).is_empty());
}

#[test]
fn test_class_declaration_is_a_type() {
    let ast = parse_clean("class Point\n    var x: int = 0\nvar p: Point\nvar y: int = p.x");
    let root = ast.root();
    let point = ast.children(root)[0];

    assert!(matches!(ast.kind(point), NodeKind::Class { .. }));
    assert_eq!(ast.body(point).len(), 1);
    assert_eq!(declared_type(&ast, ast.children(root)[1]), Some(Type::Class(point)));
}

#[test]
fn test_member_type_is_checked() {
    let (_, diagnostics) = parse_source("class Point\n    var x: int = 0\nvar p: Point\nvar s: string = p.x");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::TypeMatchError { .. })));
}

#[test]
fn test_extends_resolves_superclass() {
    let ast = parse_clean("class Base\nclass Derived\n    extends Base");
    let root = ast.root();
    let base = ast.children(root)[0];
    let derived = ast.children(root)[1];

    assert_eq!(ast.super_class(derived), Some(base));
    assert!(ast.extends_clause(derived).is_some());
}

#[test]
fn test_extends_forward_reference() {
    let ast = parse_clean("class Derived\n    extends Base\nclass Base");
    let root = ast.root();

    assert_eq!(ast.super_class(ast.children(root)[0]), Some(ast.children(root)[1]));
}

#[test]
fn test_super_resolves_to_superclass() {
    let ast = parse_clean(
        "class Base\n    var size: int = 1\nclass Derived\n    extends Base\n    var s: int = super.size",
    );
    let root = ast.root();
    let base = ast.children(root)[0];
    let derived = ast.children(root)[1];
    let s = ast.body(derived)[1];
    let access = ast.children(s)[0];

    assert_eq!(declaration_of(&ast, ast.children(access)[0]), Some(base));
}

#[test]
fn test_extends_outside_class() {
    let (ast, diagnostics) = parse_source("if 1\n    extends Base");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::ExtendsOutsideClass)));
    assert_eq!(ast.body(first_statement(&ast)).len(), 0);
}

#[test]
fn test_extends_twice() {
    let (ast, diagnostics) = parse_source("class A\nclass B\nextends A\nextends B");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::AlreadyExtends { class } if class == "Test")));
    assert_eq!(ast.super_class(ast.root()), Some(ast.children(ast.root())[0]));
}

#[test]
fn test_unknown_superclass() {
    let (_, diagnostics) = parse_source("extends Missing");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::UnknownSuperclass { class } if class == "Missing")));
}

#[test]
fn test_wildcard_import() {
    let ast = parse_clean("import geometry.shapes");
    let import = first_statement(&ast);

    assert_eq!(ast.name(import), "geometry.shapes");
    assert_eq!(
        ast.kind(import),
        &NodeKind::ImportExpression {
            package: vec!["geometry".to_string(), "shapes".to_string()],
            symbols: ImportSymbols::Wildcard,
        }
    );
}

#[test]
fn test_explicit_import() {
    let ast = parse_clean("from geometry import area, volume");
    let import = first_statement(&ast);

    assert_eq!(
        ast.kind(import),
        &NodeKind::ImportExpression {
            package: vec!["geometry".to_string()],
            symbols: ImportSymbols::Explicit(vec!["area".to_string(), "volume".to_string()]),
        }
    );
}

#[test]
fn test_file_type_header() {
    let ast = parse_clean("filetype service\n\nvar x: int = 1");

    assert_eq!(ast.file_type(), Some("service"));
    assert_eq!(ast.children(ast.root()).len(), 2);
}

#[test]
fn test_file_type_declared_twice() {
    let (ast, diagnostics) = parse_source("filetype service\nfiletype library");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::FileTypeDeclaredTwice)));
    assert_eq!(ast.file_type(), Some("service"));
    assert_eq!(ast.children(ast.root()).len(), 1);
}

#[test]
fn test_file_type_after_declarations() {
    let (ast, diagnostics) = parse_source("var x: int = 1\nfiletype service");

    assert!(diagnostics.any(|error| matches!(error, ErrorImpl::FileTypeAfterDeclarations)));
    assert_eq!(ast.file_type(), None);
}

#[test]
fn test_inline_literal_statement() {
    let ast = parse_clean("`printf(\"%d\", 1);`");

    assert_eq!(
        ast.kind(first_statement(&ast)),
        &NodeKind::InlineLiteral("printf(\"%d\", 1);".to_string())
    );
}

#[test]
fn test_every_node_reaches_root() {
    let source = "\
filetype service
import geometry
class Point
    var x: int = 0
    var y: int = 0
    move: (dx, dy: int)
        x = x + dx
        y = y + dy
    move: (d: Point)
        move d.x d.y
class Point3
    extends Point
    var z: int = 0
area: (w, h: int) -> int => w * h
main: ()
    var p: Point
    loop 3
        p.move 1 2
    loop i: int = 0, i < 10, i++
        if i == 5
            return
        else
            area i 2";
    let ast = parse_clean(source);
    let root = ast.root();
    let nodes = ast.descendants(root);

    let unique: HashSet<NodeId> = nodes.iter().copied().collect();
    assert_eq!(unique.len(), nodes.len());

    for id in nodes {
        if id == root {
            assert_eq!(ast.parent(id), None);
            continue;
        }
        let parent = ast.parent(id).unwrap();
        assert!(ast.children(parent).contains(&id));
        assert_eq!(ast.ancestors(id).last(), Some(root));
    }
}

#[test]
fn test_parse_line_outcomes() {
    let tokens = tokenize("var x: int = 1\n\n1 2".to_string(), Some("test.em".to_string())).unwrap();
    let mut parser = Parser::new(
        Box::new(TokenStream::new(tokens)),
        Rc::new("test.em".to_string()),
        "Test",
    );

    assert_eq!(parser.parse_line(), LineOutcome::Parsed);
    assert_eq!(parser.parse_line(), LineOutcome::Blank);
    assert_eq!(parser.parse_line(), LineOutcome::Skipped);
    assert_eq!(parser.parse_line(), LineOutcome::Finished);
    assert_eq!(parser.diagnostics().len(), 1);
}

#[test]
fn test_parse_line_drops_body_of_rejected_line() {
    let tokens = tokenize(
        "else\n    var b: int = 2\n\n        b\nvar c: int = 3".to_string(),
        Some("test.em".to_string()),
    )
    .unwrap();
    let mut parser = Parser::new(
        Box::new(TokenStream::new(tokens)),
        Rc::new("test.em".to_string()),
        "Test",
    );

    assert_eq!(parser.parse_line(), LineOutcome::Parsed);
    assert_eq!(parser.parse_line(), LineOutcome::Dropped);
    assert_eq!(parser.parse_line(), LineOutcome::Blank);
    assert_eq!(parser.parse_line(), LineOutcome::Dropped);
    assert_eq!(parser.parse_line(), LineOutcome::Parsed);
    assert_eq!(parser.parse_line(), LineOutcome::Finished);

    assert_eq!(parser.diagnostics().len(), 1);
    let names: Vec<&str> = parser
        .ast()
        .children(parser.ast().root())
        .iter()
        .map(|id| parser.ast().name(*id))
        .collect();
    assert_eq!(names, vec!["c"]);
}

#[test]
fn test_lookahead_window() {
    let tokens = tokenize("area: (w: int)".to_string(), Some("test.em".to_string())).unwrap();
    let parser = Parser::new(
        Box::new(TokenStream::new(tokens)),
        Rc::new("test.em".to_string()),
        "Test",
    );

    assert_eq!(parser.current_token_kind(), TokenKind::Symbol);
    assert_eq!(parser.peek_kind(1), TokenKind::Colon);
    assert_eq!(parser.peek_kind(2), TokenKind::OpenParen);
}

/// Emits the given tokens once, then `EOF` forever.
struct ScriptedSource {
    tokens: Vec<Token>,
}

impl TokenSource for ScriptedSource {
    fn next_token(&mut self) -> Token {
        if self.tokens.is_empty() {
            Token::eof(1)
        } else {
            self.tokens.remove(0)
        }
    }
}

#[test]
fn test_tokens_after_end_of_input() {
    let stray = Token {
        kind: TokenKind::Symbol,
        value: String::from("junk"),
        line: 2,
        indent: 0,
    };
    let source = ScriptedSource {
        tokens: vec![Token::eof(1), stray],
    };
    let mut parser = Parser::new(Box::new(source), Rc::new("test.em".to_string()), "Test");

    let error = parser.parse_file().unwrap_err();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnparsedTrailingTokens {
            token: String::from("junk")
        }
    );
    assert_eq!(error.get_expected(), "end of input");
    assert!(!error.get_actual().is_empty());
}
