//! Type annotation parsing.
//!
//! Annotations are plain names. Built-in names always resolve; any other name
//! must denote a class visible from the annotation's scope. An unknown name
//! is reported as a diagnostic and yields no type, so the surrounding
//! declaration can still be built.

use std::collections::HashMap;

use crate::{
    ast::{ast::NodeId, types::Type},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    type_checker::registry::lookup_type,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser, NodeId) -> Result<Option<Type>, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Symbol, parse_symbol_type);
}

/// Parses a type annotation as seen from `scope`.
pub fn parse_type(parser: &mut Parser, scope: NodeId) -> Result<Option<Type>, Error> {
    let token_kind = parser.current_token_kind();
    let handler = parser
        .get_type_nud_lookup()
        .get(&token_kind)
        .copied()
        .ok_or_else(|| parser.unexpected("a type name"))?;

    handler(parser, scope)
}

pub fn parse_symbol_type(parser: &mut Parser, scope: NodeId) -> Result<Option<Type>, Error> {
    let position = parser.get_position();
    let name = parser.expect(TokenKind::Symbol, "a type name")?.value;

    let ty = lookup_type(parser.ast(), scope, &name);
    if ty.is_none() {
        parser.report(
            Error::new(ErrorImpl::UnknownType { type_: name.clone() }, position)
                .with_context("a type name", name),
        );
    }

    Ok(ty)
}
