use crate::{
    ast::ast::{NodeId, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    parser.enter()?;
    let result = parse_expr_inner(parser, bp);
    parser.leave();
    result
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected_token()),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected_token()),
        };
        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.current_token().clone();
            match token.value.parse::<i64>() {
                Ok(value) => {
                    parser.advance();
                    Ok(parser.tree_mut().create_number(value, token.offset()))
                }
                Err(_) => Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    parser.get_position(),
                )),
            }
        }
        TokenKind::Identifier => {
            let token = parser.advance();
            Ok(parser.tree_mut().create_identifier(token.value, token.span.start.0))
        }
        _ => Err(parser.unexpected_token()),
    }
}

/// Operator text stored on OPERATOR nodes for the token `kind`.
fn operator_text(parser: &Parser, kind: TokenKind) -> Result<&'static str, Error> {
    kind.operator_text().ok_or_else(|| parser.unexpected_token())
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator = operator_text(parser, parser.current_token_kind())?;
    parser.advance();

    let right = parse_expr(parser, bp)?;
    let start = parser.tree().node(left).offset;

    Ok(parser
        .tree_mut()
        .create_operator(operator, vec![left, right], start))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let operator = operator_text(parser, parser.current_token_kind())?;
    let start = parser.advance().offset();

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(parser
        .tree_mut()
        .create_operator(operator, vec![operand], start))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Calls and indexing apply to names only.
fn expect_identifier(parser: &Parser, left: NodeId, message: &str) -> Result<(), Error> {
    if parser.tree().kind(left) == NodeKind::Identifier {
        Ok(())
    } else {
        Err(parser.unexpected_token_detailed(message))
    }
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    expect_identifier(parser, left, "only functions can be called")?;
    let start = parser.tree().node(left).offset;
    let args_start = parser.advance().offset();

    let args = parser.tree_mut().create_list(vec![], args_start);
    while parser.current_token_kind() != TokenKind::CloseParen {
        let arg = parse_expr(parser, BindingPower::Default)?;
        parser.tree_mut().append_to_list(args, arg);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(parser.tree_mut().create_at(
        NodeKind::FunctionCall,
        vec![Some(left), Some(args)],
        start,
    ))
}

pub fn parse_index_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    expect_identifier(parser, left, "only arrays can be indexed")?;
    let start = parser.tree().node(left).offset;
    parser.advance();

    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(parser.tree_mut().create_at(
        NodeKind::ArrayIndexing,
        vec![Some(left), Some(index)],
        start,
    ))
}
