use crate::{
    ast::ast::{NodeId, NodeKind},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.enter()?;

    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    let result = match handler {
        Some(handler) => handler(parser),
        None => parse_assignment_or_call_stmt(parser),
    };

    parser.leave();
    result
}

/// `x = e;`, `a[i] = e;` or `f(args);`
pub fn parse_assignment_or_call_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let target = parse_expr(parser, BindingPower::Default)?;
    let start = parser.tree().node(target).offset;

    match parser.tree().kind(target) {
        NodeKind::Identifier | NodeKind::ArrayIndexing
            if parser.current_token_kind() == TokenKind::Assignment =>
        {
            parser.advance();
            let value = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;

            Ok(parser.tree_mut().create_at(
                NodeKind::AssignmentStatement,
                vec![Some(target), Some(value)],
                start,
            ))
        }
        NodeKind::FunctionCall => {
            parser.expect(TokenKind::Semicolon)?;
            Ok(target)
        }
        _ => Err(parser.unexpected_token_detailed("expected an assignment or a function call")),
    }
}

/// `{ var a, b; statements }`
///
/// Blocks with declarations get two children, the list of VARIABLE nodes
/// followed by the statement list. Blocks without get only the statements.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();

    let declarations = parser.tree_mut().create_list(vec![], start);
    while parser.current_token_kind() == TokenKind::Var {
        let declaration = parse_local_declaration(parser)?;
        parser.tree_mut().append_to_list(declarations, declaration);
    }

    let statements = parser.tree_mut().create_list(vec![], start);
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_token_detailed("expected `}` to close the block"));
        }
        let statement = parse_stmt(parser)?;
        parser.tree_mut().append_to_list(statements, statement);
    }
    parser.expect(TokenKind::CloseCurly)?;

    let tree = parser.tree_mut();
    if tree.child_count(declarations) == 0 {
        tree.destroy(declarations);
        Ok(tree.create_at(NodeKind::Block, vec![Some(statements)], start))
    } else {
        Ok(tree.create_at(
            NodeKind::Block,
            vec![Some(declarations), Some(statements)],
            start,
        ))
    }
}

/// `var a, b;` inside a block.
pub fn parse_local_declaration(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();
    let names = parse_identifier_list(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(parser.tree_mut().create_at(
        NodeKind::Variable,
        names.into_iter().map(Some).collect(),
        start,
    ))
}

/// One or more comma separated identifiers.
pub fn parse_identifier_list(parser: &mut Parser) -> Result<Vec<NodeId>, Error> {
    let mut names = vec![];

    loop {
        let error = parser.unexpected_token_detailed("expected identifier");
        let token = parser.expect_error(TokenKind::Identifier, Some(error))?;
        let offset = token.span.start.0;
        names.push(parser.tree_mut().create_identifier(token.value, offset));

        if parser.current_token_kind() != TokenKind::Comma {
            return Ok(names);
        }
        parser.advance();
    }
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(parser
        .tree_mut()
        .create_at(NodeKind::ReturnStatement, vec![Some(value)], start))
}

/// `print "label", expression, ...;`
pub fn parse_print_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();
    let items = parser.tree_mut().create_list(vec![], start);

    loop {
        let item = if parser.current_token_kind() == TokenKind::String {
            let token = parser.advance();
            let offset = token.span.start.0;
            parser.tree_mut().create_string_literal(token.value, offset)
        } else {
            parse_expr(parser, BindingPower::Default)?
        };
        parser.tree_mut().append_to_list(items, item);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }
    parser.expect(TokenKind::Semicolon)?;

    Ok(parser
        .tree_mut()
        .create_at(NodeKind::PrintStatement, vec![Some(items)], start))
}

/// `if (condition) statement [else statement]`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_branch = parse_stmt(parser)?;
    let mut children = vec![Some(condition), Some(then_branch)];

    if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        children.push(Some(parse_stmt(parser)?));
    }

    Ok(parser
        .tree_mut()
        .create_at(NodeKind::IfStatement, children, start))
}

/// `while (condition) statement`
pub fn parse_while_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(parser.tree_mut().create_at(
        NodeKind::WhileStatement,
        vec![Some(condition), Some(body)],
        start,
    ))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.advance().offset();
    parser.expect(TokenKind::Semicolon)?;

    Ok(parser
        .tree_mut()
        .create_at(NodeKind::BreakStatement, vec![], start))
}
