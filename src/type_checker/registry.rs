use crate::ast::{
    ast::{Ast, NodeId},
    nodes::NodeKind,
    types::{get_builtin, Type},
};

use super::symbols::find_symbol;

/// Resolves a type name as seen from `scope`.
///
/// Built-in names win; otherwise `name` is resolved as a symbol and accepted
/// when it denotes a class.
pub fn lookup_type(ast: &Ast, scope: NodeId, name: &str) -> Option<Type> {
    if let Some(builtin) = get_builtin(name) {
        return Some(Type::Builtin(builtin));
    }

    find_symbol(ast, scope, name)
        .filter(|symbol| matches!(ast.kind(*symbol), NodeKind::Class { .. }))
        .map(Type::Class)
}
