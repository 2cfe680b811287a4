//! Parser module for building the Abstract Syntax Tree (AST).
//!
//! The parser consumes one logical line at a time and places it into the
//! tree according to its indentation. It uses a Pratt parser for
//! expressions and handles:
//!
//! - Block assembly from indentation deltas
//! - Statement parsing (declarations, overloads, control flow, imports)
//! - Expression parsing (operators, member access, juxtaposed calls)
//! - Type annotations
//! - Error recovery: a structural error drops the rest of its line
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod blocks;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
