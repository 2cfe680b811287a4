use std::rc::Rc;

use log::debug;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{NodeKind, NumberLiteral},
        types::Type,
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    Position,
};

use super::{registry::lookup_type, symbols::find_symbol};

const COMPARISON_OPERATORS: [&str; 6] = ["==", "!=", "<", "<=", ">", ">="];

pub fn is_comparison(operator: &str) -> bool {
    COMPARISON_OPERATORS.contains(&operator)
}

/// Computes the static type of `id` from its kind and children.
///
/// Nothing is cached, so the answer always reflects the current tree.
pub fn type_of(ast: &Ast, id: NodeId) -> Option<Type> {
    match ast.kind(id) {
        NodeKind::Class { .. } => Some(Type::Class(id)),
        NodeKind::FunctionGroup => ast.children(id).first().and_then(|first| type_of(ast, *first)),
        NodeKind::VariableDeclaration { ty } => *ty,
        NodeKind::FunctionDeclaration { .. } => Some(Type::FUNCTION),
        NodeKind::Number(NumberLiteral::Int(_)) => Some(Type::INT),
        NodeKind::Number(NumberLiteral::Double(_)) => Some(Type::DOUBLE),
        NodeKind::String(_) => Some(Type::STRING),
        NodeKind::VariableUsage { .. } => declaration_of(ast, id).and_then(|decl| type_of(ast, decl)),
        NodeKind::MemberAccess => member_of(ast, id).and_then(|member| type_of(ast, member)),
        NodeKind::Operator { operator } => {
            if is_comparison(operator) {
                Some(Type::BOOL)
            } else {
                ast.children(id).first().and_then(|left| type_of(ast, *left))
            }
        }
        NodeKind::FunctionCall => ast
            .children(id)
            .first()
            .and_then(|callee| call_target(ast, *callee))
            .and_then(|function| return_type(ast, function)),
        NodeKind::ReturnExpression => match ast.children(id).first() {
            Some(value) => type_of(ast, *value),
            None => Some(Type::VOID),
        },
        NodeKind::InlineLiteral(_)
        | NodeKind::If
        | NodeKind::Else
        | NodeKind::Loop { .. }
        | NodeKind::FileTypeDeclaration
        | NodeKind::ImportExpression { .. }
        | NodeKind::SubclassExpression => None,
    }
}

/// The declaration a variable usage refers to.
pub fn declaration_of(ast: &Ast, usage: NodeId) -> Option<NodeId> {
    match ast.kind(usage) {
        NodeKind::VariableUsage { scope } => find_symbol(ast, *scope, ast.name(usage)),
        _ => None,
    }
}

/// The member declaration a member access refers to.
///
/// Members are looked up in the object's class, then along its superclasses.
pub fn member_of(ast: &Ast, access: NodeId) -> Option<NodeId> {
    let object = *ast.children(access).first()?;
    let mut class = match type_of(ast, object)? {
        Type::Class(class) => Some(class),
        Type::Builtin(_) => None,
    };

    while let Some(current) = class {
        if let Some(member) = ast.declared_in(current, ast.name(access)) {
            return Some(member);
        }
        class = ast.super_class(current);
    }

    None
}

/// The declaration invoked by a callee expression.
pub fn call_target(ast: &Ast, callee: NodeId) -> Option<NodeId> {
    match ast.kind(callee) {
        NodeKind::VariableUsage { .. } => declaration_of(ast, callee),
        NodeKind::MemberAccess => member_of(ast, callee),
        _ => None,
    }
}

/// Return type of a function variable or of the first member of a group.
pub fn return_type(ast: &Ast, declaration: NodeId) -> Option<Type> {
    match ast.kind(declaration) {
        NodeKind::FunctionGroup => ast
            .children(declaration)
            .first()
            .and_then(|first| return_type(ast, *first)),
        NodeKind::VariableDeclaration { .. } => {
            let function = ast.function_of(declaration)?;
            match ast.kind(function) {
                NodeKind::FunctionDeclaration { return_type, .. } => Some(*return_type),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Parameter types of a function variable, in declaration order.
pub fn signature(ast: &Ast, variable: NodeId) -> Vec<Option<Type>> {
    ast.function_of(variable)
        .map(|function| {
            ast.params(function)
                .iter()
                .map(|param| type_of(ast, *param))
                .collect()
        })
        .unwrap_or_default()
}

/// Compares two neighbouring types.
///
/// Only mismatches between two known types are reported; an unknown side
/// never produces a diagnostic.
pub fn check_same_type(
    ast: &Ast,
    expected: Option<Type>,
    received: Option<Type>,
    position: Position,
) -> Result<(), Error> {
    match (expected, received) {
        (Some(expected), Some(received)) if expected != received => {
            let expected_name = expected.name(ast);
            let received_name = received.name(ast);
            Err(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: expected_name.clone(),
                    received: received_name.clone(),
                },
                position,
            )
            .with_context(expected_name, received_name))
        }
        _ => Ok(()),
    }
}

/// Resolves every pending `extends` clause in the tree.
///
/// Runs once the file is fully parsed so that a class may extend one
/// declared further down.
pub fn resolve_superclasses(ast: &mut Ast, file: &Rc<String>, diagnostics: &mut Diagnostics) {
    let classes: Vec<NodeId> = ast
        .descendants(ast.root())
        .into_iter()
        .filter(|id| matches!(ast.kind(*id), NodeKind::Class { .. }))
        .collect();

    for class in classes {
        let Some(clause) = ast.extends_clause(class) else {
            continue;
        };
        let name = ast.name(clause).to_string();

        match lookup_type(ast, class, &name) {
            Some(Type::Class(super_class)) if !inherits_from(ast, super_class, class) => {
                debug!("{} extends {:?}", ast.name(class), super_class);
                ast.node_mut(class).kind = NodeKind::Class {
                    super_class: Some(super_class),
                };
            }
            _ => diagnostics.push(
                Error::new(
                    ErrorImpl::UnknownSuperclass {
                        class: name.clone(),
                    },
                    Position(ast.node(clause).line, Rc::clone(file)),
                )
                .with_context("class name", name),
            ),
        }
    }
}

/// True if `class` is `ancestor` or reaches it through its superclasses.
fn inherits_from(ast: &Ast, class: NodeId, ancestor: NodeId) -> bool {
    let mut current = Some(class);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = ast.super_class(id);
    }
    false
}
