//! Driver and backends.
//!
//! This module turns source files into parsed trees and renders them:
//!
//! - `compiler`: the per-session file driver that follows imports
//! - `sym`: the `.sym` symbol file writer
//! - `printer`: the indented tree dump

pub mod compiler;
pub mod printer;
pub mod sym;
