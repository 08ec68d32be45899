//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Global declarations and function definitions
//! - Blocks with local declarations
//! - Expressions and operator precedence
//! - Control flow statements
//! - Error cases

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::{ast::NodeKind, print::print_syntax_tree, tree::SyntaxTree},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
};

fn parse_source(source: &str) -> Result<SyntaxTree, Error> {
    let tokens = tokenize(source.to_string(), Some("test.vsl".to_string()))?;
    parse(tokens, Rc::new("test.vsl".to_string()))
}

fn dump(source: &str) -> String {
    print_syntax_tree(&parse_source(source).unwrap(), None)
}

#[test]
fn test_parse_empty_program() {
    let tree = parse_source("").unwrap();
    let root = tree.root().unwrap();

    assert_eq!(tree.kind(root), NodeKind::List);
    assert_eq!(tree.child_count(root), 0);
    assert_eq!(tree.live_nodes(), 1);
}

#[test]
fn test_parse_operator_precedence() {
    insta::assert_snapshot!(dump("func main() return 1 + 2 * 3;"), @r"
    LIST
     FUNCTION
      IDENTIFIER (main)
      LIST
      RETURN_STATEMENT
       OPERATOR (+)
        NUMBER_LITERAL (1)
        OPERATOR (*)
         NUMBER_LITERAL (2)
         NUMBER_LITERAL (3)
    ");
}

#[test]
fn test_parse_left_associative() {
    insta::assert_snapshot!(dump("func main() return 10 - 4 - 3;"), @r"
    LIST
     FUNCTION
      IDENTIFIER (main)
      LIST
      RETURN_STATEMENT
       OPERATOR (-)
        OPERATOR (-)
         NUMBER_LITERAL (10)
         NUMBER_LITERAL (4)
        NUMBER_LITERAL (3)
    ");
}

#[test]
fn test_parse_unary_and_grouping() {
    insta::assert_snapshot!(dump("func main(a, b) return -a * (b + !1);"), @r"
    LIST
     FUNCTION
      IDENTIFIER (main)
      LIST
       IDENTIFIER (a)
       IDENTIFIER (b)
      RETURN_STATEMENT
       OPERATOR (*)
        OPERATOR (-)
         IDENTIFIER (a)
        OPERATOR (+)
         IDENTIFIER (b)
         OPERATOR (!)
          NUMBER_LITERAL (1)
    ");
}

#[test]
fn test_parse_global_declaration() {
    insta::assert_snapshot!(dump("var a, b[10];"), @r"
    LIST
     GLOBAL_DECLARATION
      LIST
       IDENTIFIER (a)
       ARRAY_INDEXING
        IDENTIFIER (b)
        NUMBER_LITERAL (10)
    ");
}

#[test]
fn test_parse_block_and_control_flow() {
    let source = r#"
func f(x) {
    var y;
    y = x;
    if (y < 2) print "small", y; else return -y;
    while (1) break;
}
"#;

    insta::assert_snapshot!(dump(source), @r#"
    LIST
     FUNCTION
      IDENTIFIER (f)
      LIST
       IDENTIFIER (x)
      BLOCK
       LIST
        VARIABLE
         IDENTIFIER (y)
       LIST
        ASSIGNMENT_STATEMENT
         IDENTIFIER (y)
         IDENTIFIER (x)
        IF_STATEMENT
         OPERATOR (<)
          IDENTIFIER (y)
          NUMBER_LITERAL (2)
         PRINT_STATEMENT
          LIST
           STRING_LITERAL ("small")
           IDENTIFIER (y)
         RETURN_STATEMENT
          OPERATOR (-)
           IDENTIFIER (y)
        WHILE_STATEMENT
         NUMBER_LITERAL (1)
         BREAK_STATEMENT
    "#);
}

#[test]
fn test_parse_calls_and_indexing() {
    insta::assert_snapshot!(dump("func g() { a[i + 1] = f(1, x); f(); }"), @r"
    LIST
     FUNCTION
      IDENTIFIER (g)
      LIST
      BLOCK
       LIST
        ASSIGNMENT_STATEMENT
         ARRAY_INDEXING
          IDENTIFIER (a)
          OPERATOR (+)
           IDENTIFIER (i)
           NUMBER_LITERAL (1)
         FUNCTION_CALL
          IDENTIFIER (f)
          LIST
           NUMBER_LITERAL (1)
           IDENTIFIER (x)
        FUNCTION_CALL
         IDENTIFIER (f)
         LIST
    ");
}

#[test]
fn test_parse_block_without_declarations_has_one_child() {
    let tree = parse_source("func f() { return 1; }").unwrap();
    let root = tree.root().unwrap();
    let function = tree.child(root, 0).unwrap();
    let body = tree.child(function, 2).unwrap();

    assert_eq!(tree.kind(body), NodeKind::Block);
    assert_eq!(tree.child_count(body), 1);
    assert_eq!(tree.kind(tree.child(body, 0).unwrap()), NodeKind::List);
}

#[test]
fn test_parse_if_without_else() {
    let tree = parse_source("func f(x) if (x) return 1;").unwrap();
    let root = tree.root().unwrap();
    let function = tree.child(root, 0).unwrap();
    let if_node = tree.child(function, 2).unwrap();

    assert_eq!(tree.kind(if_node), NodeKind::IfStatement);
    assert_eq!(tree.child_count(if_node), 2);
}

#[test]
fn test_parse_records_offsets() {
    let tree = parse_source("func main() return y;").unwrap();
    let root = tree.root().unwrap();
    let function = tree.child(root, 0).unwrap();
    let return_node = tree.child(function, 2).unwrap();
    let y = tree.child(return_node, 0).unwrap();

    assert_eq!(tree.node(function).offset, 0);
    assert_eq!(tree.node(return_node).offset, 12);
    assert_eq!(tree.node(y).offset, 19);
    assert_eq!(tree.position(y).1.as_str(), "test.vsl");
}

#[test]
fn test_parse_statement_at_top_level() {
    let error = parse_source("return 1;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_position().0, 0);
}

#[test]
fn test_parse_missing_semicolon() {
    let error = parse_source("func f() return 1").unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::UnexpectedToken {
            token: "EOF".to_string()
        }
    );
}

#[test]
fn test_parse_unclosed_block() {
    let error = parse_source("func f() { return 1;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_invalid_assignment_target() {
    let error = parse_source("func f() { 1 = 2; }").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_call_on_non_identifier() {
    let error = parse_source("func f() return (g)(1)(2);").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_parse_number_out_of_range() {
    let error = parse_source("func f() return 99999999999999999999;").unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::NumberParseError {
            token: "99999999999999999999".to_string()
        }
    );
    assert_eq!(error.get_position().0, 16);
}

#[test]
fn test_parse_nesting_too_deep() {
    let depth = 1100;
    let source = format!("func f() return {}1{};", "(".repeat(depth), ")".repeat(depth));

    let error = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(move || parse_source(&source).unwrap_err().kind().clone())
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(
        error,
        ErrorImpl::NestingTooDeep {
            limit: crate::MAX_NESTING_DEPTH
        }
    );
}
