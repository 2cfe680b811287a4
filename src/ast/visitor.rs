//! Read-only double dispatch over the AST.
//!
//! Backends implement [`Visitor`] and hand nodes to [`accept`], which picks
//! the callback for the node's kind. Callbacks decide whether to descend,
//! usually through [`walk_children`], so children are visited in order.

use super::{
    ast::{Ast, NodeId},
    nodes::NodeKind,
};

pub trait Visitor {
    fn visit_class(&mut self, ast: &Ast, id: NodeId);
    fn visit_function_group(&mut self, ast: &Ast, id: NodeId);
    fn visit_variable_declaration(&mut self, ast: &Ast, id: NodeId);
    fn visit_function_declaration(&mut self, ast: &Ast, id: NodeId);
    fn visit_variable_usage(&mut self, ast: &Ast, id: NodeId);
    fn visit_member_access(&mut self, ast: &Ast, id: NodeId);
    fn visit_operator(&mut self, ast: &Ast, id: NodeId);
    fn visit_function_call(&mut self, ast: &Ast, id: NodeId);
    fn visit_number(&mut self, ast: &Ast, id: NodeId);
    fn visit_string(&mut self, ast: &Ast, id: NodeId);
    fn visit_return(&mut self, ast: &Ast, id: NodeId);
    fn visit_if(&mut self, ast: &Ast, id: NodeId);
    fn visit_else(&mut self, ast: &Ast, id: NodeId);
    fn visit_loop(&mut self, ast: &Ast, id: NodeId);

    // Declarations consumed by the driver rather than by code generation.
    fn visit_inline_literal(&mut self, _ast: &Ast, _id: NodeId) {}
    fn visit_file_type(&mut self, _ast: &Ast, _id: NodeId) {}
    fn visit_import(&mut self, _ast: &Ast, _id: NodeId) {}
    fn visit_subclass(&mut self, _ast: &Ast, _id: NodeId) {}
}

/// Dispatches `id` to the callback matching its kind.
pub fn accept<V: Visitor + ?Sized>(visitor: &mut V, ast: &Ast, id: NodeId) {
    match ast.kind(id) {
        NodeKind::Class { .. } => visitor.visit_class(ast, id),
        NodeKind::FunctionGroup => visitor.visit_function_group(ast, id),
        NodeKind::VariableDeclaration { .. } => visitor.visit_variable_declaration(ast, id),
        NodeKind::FunctionDeclaration { .. } => visitor.visit_function_declaration(ast, id),
        NodeKind::Number(_) => visitor.visit_number(ast, id),
        NodeKind::String(_) => visitor.visit_string(ast, id),
        NodeKind::InlineLiteral(_) => visitor.visit_inline_literal(ast, id),
        NodeKind::VariableUsage { .. } => visitor.visit_variable_usage(ast, id),
        NodeKind::MemberAccess => visitor.visit_member_access(ast, id),
        NodeKind::Operator { .. } => visitor.visit_operator(ast, id),
        NodeKind::FunctionCall => visitor.visit_function_call(ast, id),
        NodeKind::If => visitor.visit_if(ast, id),
        NodeKind::Else => visitor.visit_else(ast, id),
        NodeKind::Loop { .. } => visitor.visit_loop(ast, id),
        NodeKind::ReturnExpression => visitor.visit_return(ast, id),
        NodeKind::FileTypeDeclaration => visitor.visit_file_type(ast, id),
        NodeKind::ImportExpression { .. } => visitor.visit_import(ast, id),
        NodeKind::SubclassExpression => visitor.visit_subclass(ast, id),
    }
}

/// Visits every child of `id` in order.
pub fn walk_children<V: Visitor + ?Sized>(visitor: &mut V, ast: &Ast, id: NodeId) {
    for child in ast.children(id) {
        accept(visitor, ast, *child);
    }
}
