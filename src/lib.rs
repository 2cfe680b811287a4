#![allow(clippy::module_inception)]

use std::{path::Path, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// Source line (1-based) and the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

/// Returns the text of `line` (1-based) without its line terminator.
pub fn get_line_at_position(source: &str, line: u32) -> Option<String> {
    if line == 0 {
        return None;
    }

    source
        .lines()
        .nth(line as usize - 1)
        .map(|text| text.to_string())
}


/// Formats a diagnostic with the offending source line.
///
/// ```text
/// Error: UnknownType (...)
/// -> shapes.em:3
///   |
/// 3 | var a: Foo = 1
///   | ^^^^^^^^^^^^^^
///   = expected: a type name
///   = actual: Foo
/// ```
pub fn render_error(error: &Error, file: &Path, source: &str) -> String {
    let position = error.get_position();
    let line_string = position.0.to_string();
    let padding = line_string.len() + 2;

    let mut output = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    output.push_str(&format!("-> {}:{}\n", file.display(), position.0));

    if let Some(line_text) = get_line_at_position(source, position.0) {
        let trimmed = line_text.trim();
        let marks = trimmed.chars().count().max(1);

        output.push_str(&format!("{:>padding$}\n", "|"));
        output.push_str(&format!("{} | {}\n", line_string, trimmed));
        output.push_str(&format!("{:>padding$} {}\n", "|", "^".repeat(marks)));
    }

    if !error.get_expected().is_empty() {
        output.push_str(&format!("{:>padding$} expected: {}\n", "=", error.get_expected()));
    }
    if !error.get_actual().is_empty() {
        output.push_str(&format!("{:>padding$} actual: {}\n", "=", error.get_actual()));
    }

    output
}

pub fn display_error(error: &Error, file: &Path, source: &str) {
    eprint!("{}", render_error(error, file, source));
}
