use std::collections::HashMap;

use crate::{ast::ast::NodeId, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, loosest first.
///
/// Operators of equal power associate to the left.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Relational,
    Additive,
    Multiplicative,
    Postfix,
    Call,
    Member,
    Primary,
}

/// Parses one statement line under the given parent.
///
/// Returns the node that was inserted into the tree, or `None` when the line
/// was consumed without producing a node.
pub type StmtHandler = fn(&mut Parser, NodeId) -> Result<Option<NodeId>, Error>;
/// Parses a primary expression resolving names from the given scope.
pub type NUDHandler = fn(&mut Parser, NodeId) -> Result<NodeId, Error>;
/// Extends `left` with the operator at the current token.
pub type LEDHandler = fn(&mut Parser, NodeId, NodeId, BindingPower) -> Result<NodeId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Assignment and equality
    parser.led(TokenKind::Assignment, BindingPower::Assignment, parse_binary_expr);
    parser.led(TokenKind::Equals, BindingPower::Assignment, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Assignment, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);

    parser.led(TokenKind::PlusPlus, BindingPower::Postfix, parse_postfix_expr);
    parser.led(TokenKind::MinusMinus, BindingPower::Postfix, parse_postfix_expr);

    // Member
    parser.led(TokenKind::Dot, BindingPower::Member, parse_member_expr);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::Symbol, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::InlineLiteral, parse_primary_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Statements
    parser.stmt(TokenKind::Var, parse_var_decl_stmt);
    parser.stmt(TokenKind::Class, parse_class_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Else, parse_else_stmt);
    parser.stmt(TokenKind::Loop, parse_loop_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Extends, parse_extends_stmt);
    parser.stmt(TokenKind::Import, parse_import_stmt);
    parser.stmt(TokenKind::From, parse_import_stmt);
    parser.stmt(TokenKind::FileType, parse_file_type_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
