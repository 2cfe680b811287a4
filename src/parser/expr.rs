use crate::{
    ast::{
        ast::NodeId,
        nodes::{NodeKind, NumberLiteral},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    type_checker::type_checker::{check_same_type, type_of},
};

use super::{lookups::BindingPower, parser::Parser};

/// Parses an expression whose operators bind tighter than `bp`.
///
/// Names are resolved from `scope`, which must already be part of the tree.
pub fn parse_expr(parser: &mut Parser, scope: NodeId, bp: BindingPower) -> Result<NodeId, Error> {
    let mut left = parse_operand(parser, scope)?;

    while parser.current_token_kind().is_operator() {
        let token_kind = parser.current_token_kind();
        let Some(operator_bp) = parser.get_bp_lookup().get(&token_kind).copied() else {
            let operator = parser.current_token().value.clone();
            return Err(Error::new(
                ErrorImpl::UnknownOperator {
                    operator: operator.clone(),
                },
                parser.get_position(),
            )
            .with_context("an operator usable in expressions", operator));
        };

        if operator_bp <= bp {
            break;
        }

        let handler = parser
            .get_led_lookup()
            .get(&token_kind)
            .copied()
            .ok_or_else(|| parser.unexpected("an operator"))?;
        left = handler(parser, scope, left, operator_bp)?;
    }

    Ok(left)
}

/// A primary expression with its member accesses and call arguments.
///
/// A callable primary directly followed by another primary is a call; the
/// following primaries up to the next operator are its arguments.
fn parse_operand(parser: &mut Parser, scope: NodeId) -> Result<NodeId, Error> {
    let callee = parse_member_chain(parser, scope)?;

    let callable = matches!(
        parser.ast().kind(callee),
        NodeKind::VariableUsage { .. } | NodeKind::MemberAccess
    );
    if callable && parser.current_token_kind().starts_primary() {
        return parse_call_expr(parser, scope, callee);
    }

    Ok(callee)
}

fn parse_member_chain(parser: &mut Parser, scope: NodeId) -> Result<NodeId, Error> {
    let token_kind = parser.current_token_kind();
    let handler = parser
        .get_nud_lookup()
        .get(&token_kind)
        .copied()
        .ok_or_else(|| parser.unexpected("an expression"))?;
    let mut object = handler(parser, scope)?;

    while parser.current_token_kind() == TokenKind::Dot {
        object = parse_member_expr(parser, scope, object, BindingPower::Member)?;
    }

    Ok(object)
}

pub fn parse_primary_expr(parser: &mut Parser, scope: NodeId) -> Result<NodeId, Error> {
    let token = parser.current_token().clone();

    let kind = match token.kind {
        TokenKind::Number => NodeKind::Number(parse_number(parser)?),
        TokenKind::Symbol => NodeKind::VariableUsage { scope },
        TokenKind::String => NodeKind::String(token.value.clone()),
        TokenKind::InlineLiteral => NodeKind::InlineLiteral(token.value.clone()),
        _ => return Err(parser.unexpected("an expression")),
    };
    parser.advance();

    let name = match token.kind {
        TokenKind::Symbol => token.value,
        _ => String::new(),
    };
    Ok(parser.alloc(kind, name, token.line))
}

fn parse_number(parser: &Parser) -> Result<NumberLiteral, Error> {
    let value = &parser.current_token().value;
    let error = || {
        Error::new(
            ErrorImpl::NumberParseError {
                token: value.clone(),
            },
            parser.get_position(),
        )
        .with_context("a number in range", value.clone())
    };

    if value.contains('.') {
        value.parse().map(NumberLiteral::Double).map_err(|_| error())
    } else {
        value.parse().map(NumberLiteral::Int).map_err(|_| error())
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    scope: NodeId,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance();
    let position = parser.get_position();

    let right = parse_expr(parser, scope, bp)?;

    // Both sides of an assignment or equality are compared directly
    if bp == BindingPower::Assignment {
        let ast = parser.ast();
        if let Err(error) = check_same_type(ast, type_of(ast, left), type_of(ast, right), position) {
            parser.report(error);
        }
    }

    let operator = parser.alloc(
        NodeKind::Operator {
            operator: operator_token.value,
        },
        "",
        operator_token.line,
    );
    parser.ast_mut().attach(operator, left);
    parser.ast_mut().attach(operator, right);
    Ok(operator)
}

pub fn parse_postfix_expr(
    parser: &mut Parser,
    _scope: NodeId,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance();

    let operator = parser.alloc(
        NodeKind::Operator {
            operator: operator_token.value,
        },
        "",
        operator_token.line,
    );
    parser.ast_mut().attach(operator, left);
    Ok(operator)
}

pub fn parse_member_expr(
    parser: &mut Parser,
    _scope: NodeId,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.advance();
    let member = parser.expect(TokenKind::Symbol, "a member name")?;

    let access = parser.alloc(NodeKind::MemberAccess, member.value, member.line);
    parser.ast_mut().attach(access, left);
    Ok(access)
}

pub fn parse_grouping_expr(parser: &mut Parser, scope: NodeId) -> Result<NodeId, Error> {
    parser.advance();
    let expr = parse_expr(parser, scope, BindingPower::Default)?;

    if parser.current_token_kind() != TokenKind::CloseParen {
        return Err(Error::new(ErrorImpl::UnmatchedParenthesis, parser.get_position())
            .with_context(")", parser.current_token().to_string()));
    }
    parser.advance();

    Ok(expr)
}

/// Collects juxtaposed arguments after `callee`.
///
/// `()` stands for an empty argument list and adds no argument.
pub fn parse_call_expr(parser: &mut Parser, scope: NodeId, callee: NodeId) -> Result<NodeId, Error> {
    let line = parser.current_token().line;
    let mut args = vec![];

    while parser.current_token_kind().starts_primary() {
        if parser.current_token_kind() == TokenKind::OpenParen
            && parser.peek_kind(1) == TokenKind::CloseParen
        {
            parser.advance();
            parser.advance();
            continue;
        }

        args.push(parse_member_chain(parser, scope)?);
    }

    let call = parser.alloc(NodeKind::FunctionCall, "", line);
    parser.ast_mut().attach(call, callee);
    for arg in args {
        parser.ast_mut().attach(call, arg);
    }

    Ok(call)
}
