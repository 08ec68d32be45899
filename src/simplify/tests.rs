//! Unit tests for constant folding and unreachable-code removal.

use std::rc::Rc;

use super::{
    constant_fold::{constant_fold_syntax_tree, evaluate},
    simplify_syntax_tree,
    unreachable::remove_unreachable_code_syntax_tree,
};
use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        print::print_syntax_tree,
        tree::SyntaxTree,
    },
    context::CompilationUnit,
    errors::errors::ErrorImpl,
};

fn parse(source: &str) -> SyntaxTree {
    CompilationUnit::from_source(source.to_string(), None).unwrap().tree
}

fn simplified(source: &str) -> SyntaxTree {
    let mut tree = parse(source);
    simplify_syntax_tree(&mut tree).unwrap();
    assert_no_leaks(&tree);
    tree
}

fn assert_no_leaks(tree: &SyntaxTree) {
    assert_eq!(tree.live_nodes(), tree.descendants(tree.root().unwrap()).len());
}

/// The body of the first function in the program.
fn first_body(tree: &SyntaxTree) -> Option<NodeId> {
    let function = tree.child(tree.root().unwrap(), 0).unwrap();
    tree.child(function, 2)
}

fn statement_count(tree: &SyntaxTree, block: NodeId) -> usize {
    let statements = tree.child(block, tree.child_count(block) - 1).unwrap();
    tree.child_count(statements)
}

/// True if control can not fall off the end of `node`.
fn always_returns(tree: &SyntaxTree, node: Option<NodeId>) -> bool {
    let Some(id) = node else {
        return false;
    };

    match tree.kind(id) {
        NodeKind::ReturnStatement => true,
        NodeKind::Block => {
            let statements = tree.child(id, tree.child_count(id) - 1).unwrap();
            let last = tree.child_count(statements).checked_sub(1);
            last.is_some_and(|last| always_returns(tree, tree.child(statements, last)))
        }
        NodeKind::IfStatement => {
            always_returns(tree, tree.child(id, 1)) && always_returns(tree, tree.child(id, 2))
        }
        _ => false,
    }
}

#[test]
fn test_evaluate_operators() {
    assert_eq!(evaluate("-", &[5]), Ok(-5));
    assert_eq!(evaluate("!", &[0]), Ok(1));
    assert_eq!(evaluate("!", &[7]), Ok(0));
    assert_eq!(evaluate("==", &[2, 2]), Ok(1));
    assert_eq!(evaluate("!=", &[2, 2]), Ok(0));
    assert_eq!(evaluate("<", &[1, 2]), Ok(1));
    assert_eq!(evaluate("<=", &[3, 2]), Ok(0));
    assert_eq!(evaluate(">", &[3, 2]), Ok(1));
    assert_eq!(evaluate(">=", &[2, 2]), Ok(1));
    assert_eq!(evaluate("+", &[2, 3]), Ok(5));
    assert_eq!(evaluate("-", &[2, 3]), Ok(-1));
    assert_eq!(evaluate("*", &[-4, 3]), Ok(-12));
    assert_eq!(evaluate("/", &[7, 2]), Ok(3));
    assert_eq!(evaluate("/", &[-7, 2]), Ok(-3));
}

#[test]
fn test_evaluate_wraps() {
    assert_eq!(evaluate("+", &[i64::MAX, 1]), Ok(i64::MIN));
    assert_eq!(evaluate("*", &[i64::MAX, 2]), Ok(-2));
    assert_eq!(evaluate("-", &[i64::MIN]), Ok(i64::MIN));
    assert_eq!(evaluate("/", &[i64::MIN, -1]), Ok(i64::MIN));
}

#[test]
fn test_evaluate_errors() {
    assert_eq!(evaluate("/", &[1, 0]), Err(ErrorImpl::DivisionByZero));
    assert_eq!(
        evaluate("%", &[1, 2]),
        Err(ErrorImpl::UnknownOperator {
            operator: "%".to_string(),
            operands: 2
        })
    );
    assert_eq!(
        evaluate("*", &[1]),
        Err(ErrorImpl::UnknownOperator {
            operator: "*".to_string(),
            operands: 1
        })
    );
}

#[test]
fn test_fold_literal_expression() {
    let mut tree = parse("func f() return 2 * (3 + 4) - -1 + (1 < 2);");
    constant_fold_syntax_tree(&mut tree).unwrap();

    let body = first_body(&tree).unwrap();
    let value = tree.child(body, 0).unwrap();
    assert_eq!(tree.node(value).number(), Some(16));
    assert_eq!(tree.child_count(value), 0);
    assert_no_leaks(&tree);
}

#[test]
fn test_fold_leaves_symbols_alone() {
    let mut tree = parse("func f(x) return x + 2 * 3;");
    constant_fold_syntax_tree(&mut tree).unwrap();

    insta::assert_snapshot!(print_syntax_tree(&tree, None), @r"
    LIST
     FUNCTION
      IDENTIFIER (f)
      LIST
       IDENTIFIER (x)
      RETURN_STATEMENT
       OPERATOR (+)
        IDENTIFIER (x)
        NUMBER_LITERAL (6)
    ");
}

#[test]
fn test_fold_division_by_zero() {
    let mut tree = parse("func f() return 1 / 0;");
    let error = constant_fold_syntax_tree(&mut tree).unwrap_err();

    assert_eq!(error.kind(), &ErrorImpl::DivisionByZero);
    assert_eq!(error.get_position().0, 16);
}

#[test]
fn test_fold_unknown_operator() {
    let mut tree = SyntaxTree::new(Rc::new("test.vsl".to_string()));
    let one = tree.create_number(1, 0);
    let operator = tree.create_operator("+", vec![one], 3);
    tree.set_root(Some(operator));

    let error = constant_fold_syntax_tree(&mut tree).unwrap_err();

    assert_eq!(
        error.kind(),
        &ErrorImpl::UnknownOperator {
            operator: "+".to_string(),
            operands: 1
        }
    );
    assert_eq!(error.get_position().0, 3);
}

#[test]
fn test_if_true_keeps_then_branch() {
    let tree = simplified("func main() { if (1) { return 1; } else { return 2; } }");

    insta::assert_snapshot!(print_syntax_tree(&tree, None), @r"
    LIST
     FUNCTION
      IDENTIFIER (main)
      LIST
      BLOCK
       LIST
        BLOCK
         LIST
          RETURN_STATEMENT
           NUMBER_LITERAL (1)
    ");
}

#[test]
fn test_if_false_keeps_else_branch() {
    let tree = simplified("func main() if (2 < 1) return 1; else return 2;");

    let body = first_body(&tree).unwrap();
    assert_eq!(tree.kind(body), NodeKind::ReturnStatement);
    assert_eq!(tree.node(tree.child(body, 0).unwrap()).number(), Some(2));
}

#[test]
fn test_if_false_without_else_is_deleted() {
    let mut tree = parse("func main() { if (0) return 1; return 2; }");
    constant_fold_syntax_tree(&mut tree).unwrap();

    let body = first_body(&tree).unwrap();
    assert_eq!(statement_count(&tree, body), 1);
    assert_no_leaks(&tree);
}

#[test]
fn test_while_false_is_deleted() {
    let mut tree = parse("var x;\nfunc main() { x = 1; while (0) { x = 1; } return x; }");
    let function = tree.child(tree.root().unwrap(), 1).unwrap();
    let body = tree.child(function, 2).unwrap();
    assert_eq!(statement_count(&tree, body), 3);

    constant_fold_syntax_tree(&mut tree).unwrap();

    assert_eq!(statement_count(&tree, body), 2);
    assert_no_leaks(&tree);
}

#[test]
fn test_while_true_is_kept() {
    let tree = simplified("func main() { while (1) break; }");

    insta::assert_snapshot!(print_syntax_tree(&tree, None), @r"
    LIST
     FUNCTION
      IDENTIFIER (main)
      LIST
      BLOCK
       LIST
        BLOCK
         LIST
          WHILE_STATEMENT
           NUMBER_LITERAL (1)
           BREAK_STATEMENT
        RETURN_STATEMENT
         NUMBER_LITERAL (0)
    ");
}

#[test]
fn test_fold_is_idempotent() {
    let mut tree = parse(
        "func main(a) { if (1 + 1 == 2) print \"yes\", 2 * a; while (0) a = 1; if (a) return -3; return 4 / 2; }",
    );
    constant_fold_syntax_tree(&mut tree).unwrap();
    let once = print_syntax_tree(&tree, None);
    let live = tree.live_nodes();

    constant_fold_syntax_tree(&mut tree).unwrap();

    assert_eq!(print_syntax_tree(&tree, None), once);
    assert_eq!(tree.live_nodes(), live);
}

#[test]
fn test_simplify_is_idempotent() {
    let mut tree = simplified("func main(a) { if (a) return 1; a = 2; } func g() return 0;");
    let once = print_syntax_tree(&tree, None);

    simplify_syntax_tree(&mut tree).unwrap();

    assert_eq!(print_syntax_tree(&tree, None), once);
}

#[test]
fn test_missing_return_is_appended() {
    let tree = simplified("var x;\nfunc main() { x = 1; }");

    insta::assert_snapshot!(print_syntax_tree(&tree, None), @r"
    LIST
     GLOBAL_DECLARATION
      LIST
       IDENTIFIER (x)
     FUNCTION
      IDENTIFIER (main)
      LIST
      BLOCK
       LIST
        BLOCK
         LIST
          ASSIGNMENT_STATEMENT
           IDENTIFIER (x)
           NUMBER_LITERAL (1)
        RETURN_STATEMENT
         NUMBER_LITERAL (0)
    ");

    let function = tree.child(tree.root().unwrap(), 1).unwrap();
    let body = tree.child(function, 2).unwrap();
    assert_eq!(statement_count(&tree, body), 2);
}

#[test]
fn test_folded_away_body_gets_return() {
    let tree = simplified("func main() if (0) return 1;");

    insta::assert_snapshot!(print_syntax_tree(&tree, None), @r"
    LIST
     FUNCTION
      IDENTIFIER (main)
      LIST
      BLOCK
       LIST
        RETURN_STATEMENT
         NUMBER_LITERAL (0)
    ");
}

#[test]
fn test_statements_after_return_are_removed() {
    let mut tree = parse("func main(x) { return 1; print \"dead\"; x = 2; }");
    remove_unreachable_code_syntax_tree(&mut tree).unwrap();

    let body = first_body(&tree).unwrap();
    assert_eq!(statement_count(&tree, body), 1);
    assert_no_leaks(&tree);
}

#[test]
fn test_dead_code_inside_loop_is_removed() {
    let tree = simplified("func main(x) { while (x) { break; x = 1; } }");

    insta::assert_snapshot!(print_syntax_tree(&tree, None), @r"
    LIST
     FUNCTION
      IDENTIFIER (main)
      LIST
       IDENTIFIER (x)
      BLOCK
       LIST
        BLOCK
         LIST
          WHILE_STATEMENT
           IDENTIFIER (x)
           BLOCK
            LIST
             BREAK_STATEMENT
        RETURN_STATEMENT
         NUMBER_LITERAL (0)
    ");
}

#[test]
fn test_if_without_else_does_not_interrupt() {
    let tree = simplified("func main(x) { if (x) return 1; }");

    let body = first_body(&tree).unwrap();
    assert_eq!(statement_count(&tree, body), 2);
    assert!(always_returns(&tree, Some(body)));
}

#[test]
fn test_if_with_returning_branches_interrupts() {
    let tree = simplified("func main(x) { if (x) return 1; else return 2; x = 3; }");

    let body = first_body(&tree).unwrap();
    assert_eq!(statement_count(&tree, body), 1);
    let statements = tree.child(body, 0).unwrap();
    let if_node = tree.child(statements, 0).unwrap();
    assert_eq!(tree.kind(if_node), NodeKind::IfStatement);
}

#[test]
fn test_every_function_returns() {
    let programs = [
        "func a() { }",
        "func b(x) { if (x) return 1; }",
        "func c(x) { while (x) x = x - 1; }",
        "func d(x) if (x) return 1; else return 2;",
        "func e(x) { var y; y = x; { return y; } }",
        "func f() if (0) return 1;",
        "func g() print \"only\";",
    ];

    for program in programs {
        let tree = simplified(program);
        assert!(always_returns(&tree, first_body(&tree)), "{}", program);
    }
}
