/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node arena and tree operations
/// - nodes: The closed set of node kinds
/// - types: Type representations and the built-in type table
/// - visitor: Read-only double dispatch for backends
pub mod ast;
pub mod nodes;
pub mod types;
pub mod visitor;
