//! Type system definitions for the AST.
//!
//! Types are compared by identity: built-ins by their [`BuiltinType`]
//! discriminant, user classes by the [`NodeId`] of the class node that
//! declares them. There is no structural type equality.

use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;

use super::ast::{Ast, NodeId};

/// The fixed set of primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Int,
    Bool,
    Char,
    Double,
    Float,
    Long,
    Short,
    String,
    Void,
    Function,
    /// Abstract super-type of the floating and wide numeric types.
    RationalNumber,
}

lazy_static! {
    static ref BUILTIN_LOOKUP: HashMap<&'static str, BuiltinType> = {
        let mut map = HashMap::new();
        for builtin in BuiltinType::ALL {
            map.insert(builtin.name(), builtin);
        }
        map
    };
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 11] = [
        BuiltinType::Int,
        BuiltinType::Bool,
        BuiltinType::Char,
        BuiltinType::Double,
        BuiltinType::Float,
        BuiltinType::Long,
        BuiltinType::Short,
        BuiltinType::String,
        BuiltinType::Void,
        BuiltinType::Function,
        BuiltinType::RationalNumber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinType::Int => "int",
            BuiltinType::Bool => "bool",
            BuiltinType::Char => "char",
            BuiltinType::Double => "double",
            BuiltinType::Float => "float",
            BuiltinType::Long => "long",
            BuiltinType::Short => "short",
            BuiltinType::String => "string",
            BuiltinType::Void => "void",
            BuiltinType::Function => "function",
            BuiltinType::RationalNumber => "rational_number",
        }
    }

    pub fn super_type(&self) -> Option<BuiltinType> {
        match self {
            BuiltinType::Double | BuiltinType::Float | BuiltinType::Long => {
                Some(BuiltinType::RationalNumber)
            }
            _ => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, BuiltinType::Int | BuiltinType::Short | BuiltinType::Long)
    }
}

/// Looks up a primitive type by its source name.
pub fn get_builtin(name: &str) -> Option<BuiltinType> {
    BUILTIN_LOOKUP.get(name).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Builtin(BuiltinType),
    /// A user class, identified by its declaring node.
    Class(NodeId),
}

impl Type {
    pub const INT: Type = Type::Builtin(BuiltinType::Int);
    pub const BOOL: Type = Type::Builtin(BuiltinType::Bool);
    pub const DOUBLE: Type = Type::Builtin(BuiltinType::Double);
    pub const STRING: Type = Type::Builtin(BuiltinType::String);
    pub const VOID: Type = Type::Builtin(BuiltinType::Void);
    pub const FUNCTION: Type = Type::Builtin(BuiltinType::Function);

    pub fn super_type(&self, ast: &Ast) -> Option<Type> {
        match self {
            Type::Builtin(builtin) => builtin.super_type().map(Type::Builtin),
            Type::Class(class) => ast.super_class(*class).map(Type::Class),
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Builtin(builtin) if builtin.is_integral())
    }

    /// Source-level name of the type.
    pub fn name(&self, ast: &Ast) -> String {
        match self {
            Type::Builtin(builtin) => builtin.name().to_string(),
            Type::Class(class) => ast.name(*class).to_string(),
        }
    }
}

impl Display for BuiltinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
