//! Indentation based block assembly.
//!
//! A new line is placed relative to the node inserted by the previous line:
//!
//! - deeper indentation nests the line into the block that node owns
//! - equal indentation makes it a sibling in the same scope
//! - shallower indentation closes blocks until one indented less than the line
//!
//! Function groups and function variables are transparent here: a sibling of
//! an overloaded function lands in the scope that owns the group.

use crate::{
    ast::ast::{Ast, NodeId},
    errors::errors::{Error, ErrorImpl},
    type_checker::symbols::enclosing_scope,
    Position,
};

/// Finds the node a line indented by `indent` belongs under.
pub fn parent_for_new_line(
    ast: &Ast,
    last_inserted: Option<NodeId>,
    indent: u32,
    position: Position,
) -> Result<NodeId, Error> {
    let root = ast.root();
    let last = match last_inserted {
        Some(last) if !ast.children(root).is_empty() => last,
        _ => return Ok(root),
    };
    let last_column = ast.node(last).column;

    if indent > last_column {
        return block_owner(ast, last).ok_or_else(|| {
            Error::new(
                ErrorImpl::CannotOwnBlock {
                    construct: ast.kind(last).describe().to_string(),
                },
                position.clone(),
            )
            .with_context("a block statement", ast.kind(last).describe())
        });
    }

    let illegal = |position: Position| {
        Error::new(ErrorImpl::IllegalIndentation { indent }, position)
            .with_context("the indentation of an enclosing block", format!("{} columns", indent))
    };

    let mut parent = enclosing_scope(ast, last).ok_or_else(|| illegal(position.clone()))?;

    if indent == last_column {
        return Ok(parent);
    }

    while ast.node(parent).column >= indent {
        match enclosing_scope(ast, parent) {
            Some(outer) => parent = outer,
            None => break,
        }
    }

    if ast.node(parent).column >= indent && parent != root {
        return Err(illegal(position));
    }

    Ok(parent)
}

/// The node that owns lines indented under `node`.
///
/// A function variable hands its block to the function it names.
fn block_owner(ast: &Ast, node: NodeId) -> Option<NodeId> {
    if ast.kind(node).is_block() {
        return Some(node);
    }

    ast.function_of(node)
}
