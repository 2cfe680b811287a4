//! Node kinds of the AST.
//!
//! [`NodeKind`] is a closed sum type. Children are stored on the owning
//! [`Node`](super::ast::Node) in evaluation order; the layout of each kind's
//! child list is documented on its variant.

use super::{ast::NodeId, types::Type};

#[derive(Debug, Clone, PartialEq)]
pub enum NumberLiteral {
    Int(i64),
    Double(f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSymbols {
    /// `import pkg`
    Wildcard,
    /// `from pkg import a, b`
    Explicit(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A named scope that is also a type. Children are its members.
    Class { super_class: Option<NodeId> },
    /// Overloads sharing one name. Children are function variables only.
    FunctionGroup,
    /// At most one child: the initializer, or the function it names.
    VariableDeclaration { ty: Option<Type> },
    /// Children: `params` parameter declarations, then the body.
    FunctionDeclaration { return_type: Type, params: usize },
    Number(NumberLiteral),
    String(String),
    /// Target code passed through verbatim.
    InlineLiteral(String),
    /// Name reference; resolved from `scope` outward.
    VariableUsage { scope: NodeId },
    /// Child: the object expression. The member name is the node name.
    MemberAccess,
    /// Children: left operand, then the right operand for binary operators.
    Operator { operator: String },
    /// Children: callee, then the arguments.
    FunctionCall,
    /// Children: condition, then the body.
    If,
    Else,
    /// Children: init, condition, iteration, then the body.
    Loop { desugared: bool },
    /// At most one child: the returned value.
    ReturnExpression,
    /// The declared file type is the node name.
    FileTypeDeclaration,
    ImportExpression {
        package: Vec<String>,
        symbols: ImportSymbols,
    },
    /// Pending `extends` clause; the superclass name is the node name.
    SubclassExpression,
}

impl NodeKind {
    /// Human readable name used in diagnostics and debug output.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Class { .. } => "class",
            NodeKind::FunctionGroup => "function group",
            NodeKind::VariableDeclaration { .. } => "variable declaration",
            NodeKind::FunctionDeclaration { .. } => "function declaration",
            NodeKind::Number(_) => "number",
            NodeKind::String(_) => "string",
            NodeKind::InlineLiteral(_) => "inline literal",
            NodeKind::VariableUsage { .. } => "variable usage",
            NodeKind::MemberAccess => "member access",
            NodeKind::Operator { .. } => "operator",
            NodeKind::FunctionCall => "function call",
            NodeKind::If => "if",
            NodeKind::Else => "else",
            NodeKind::Loop { .. } => "loop",
            NodeKind::ReturnExpression => "return expression",
            NodeKind::FileTypeDeclaration => "file type declaration",
            NodeKind::ImportExpression { .. } => "import expression",
            NodeKind::SubclassExpression => "subclass expression",
        }
    }

    /// Kinds that own an indented block of statements.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Class { .. }
                | NodeKind::FunctionDeclaration { .. }
                | NodeKind::If
                | NodeKind::Else
                | NodeKind::Loop { .. }
        )
    }

    /// Kinds that can own children at all.
    pub fn is_parent_capable(&self) -> bool {
        !matches!(
            self,
            NodeKind::Number(_)
                | NodeKind::String(_)
                | NodeKind::InlineLiteral(_)
                | NodeKind::VariableUsage { .. }
                | NodeKind::FileTypeDeclaration
                | NodeKind::ImportExpression { .. }
                | NodeKind::SubclassExpression
        )
    }

    /// Kinds a name lookup may resolve to.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::Class { .. } | NodeKind::FunctionGroup | NodeKind::VariableDeclaration { .. }
        )
    }

    /// Number of leading children that are not body statements.
    pub fn header_len(&self) -> usize {
        match self {
            NodeKind::FunctionDeclaration { params, .. } => *params,
            NodeKind::If => 1,
            NodeKind::Loop { .. } => 3,
            _ => 0,
        }
    }
}
