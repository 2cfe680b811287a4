use crate::ast::ast::{Ast, NodeId};

/// Resolves `name` from `scope` outward.
///
/// Each scope on the owning-parent chain (innermost first) is searched for a
/// direct child declaring `name`. `super` resolves to the superclass of the
/// enclosing class instead. An unresolved name is not an error here.
pub fn find_symbol(ast: &Ast, scope: NodeId, name: &str) -> Option<NodeId> {
    if name == "super" {
        return ast
            .containing_class(scope)
            .and_then(|class| ast.super_class(class));
    }

    std::iter::once(scope)
        .chain(ast.ancestors(scope))
        .filter(|id| ast.kind(*id).is_block())
        .find_map(|id| ast.declared_in(id, name))
}

/// The innermost block-like node enclosing `node` (not `node` itself).
pub fn enclosing_scope(ast: &Ast, node: NodeId) -> Option<NodeId> {
    ast.ancestors(node).find(|id| ast.kind(*id).is_block())
}
