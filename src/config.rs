//! Compiler options shared by the lexer, the file driver and the CLI.

use std::path::PathBuf;

use clap::ValueEnum;

/// Artifact written by the driver after a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// Indented rendering of the AST.
    Tree,
    /// `.sym` symbol file listing declarations and signatures.
    Sym,
}

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Columns a tab counts for when measuring indentation.
    pub tab_width: u32,
    pub emit: Emit,
    pub output_dir: PathBuf,
    /// Extension used to locate imported files.
    pub extension: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            tab_width: 4,
            emit: Emit::Tree,
            output_dir: PathBuf::from("build"),
            extension: String::from("em"),
        }
    }
}
