//! Symbol resolution and shallow type checking.
//!
//! This module answers the questions the parser asks while it builds the
//! tree:
//!
//! - Which declaration does a name refer to (scope-chain lookup)
//! - Which type does a type name denote (built-ins, then classes)
//! - What is the static type of a node
//! - Do two neighbouring types match
//!
//! Checks are deliberately shallow: only a declaration and its initializer,
//! or the two sides of an assignment or equality, are compared.

pub mod registry;
pub mod symbols;
pub mod type_checker;
