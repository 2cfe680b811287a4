//! `.sym` symbol file backend.
//!
//! Lists what a file exports so other files can be checked against it
//! without re-parsing: the class header, then one entry per top level
//! member. Function groups are written member by member.
//!
//! ```text
//! ClassName: shapes
//! CompilerVersion: 0.1.0
//! ExtendsClass: Base
//!
//! Var: count int
//!
//! Arg: w int
//! Arg: h int
//! Fun: area int
//! ```

use crate::ast::{
    ast::{Ast, NodeId},
    nodes::NodeKind,
    types::Type,
    visitor::{accept, Visitor},
};

pub const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Default)]
pub struct SymbolWriter {
    output: String,
}

impl SymbolWriter {
    pub fn new() -> Self {
        SymbolWriter::default()
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }
}

/// Renders the symbol file of a parsed file.
pub fn write_symbols(ast: &Ast) -> String {
    let mut writer = SymbolWriter::new();
    accept(&mut writer, ast, ast.root());
    writer.finish()
}

fn type_name(ast: &Ast, ty: Option<Type>) -> String {
    ty.map(|ty| ty.name(ast)).unwrap_or_else(|| String::from("?"))
}

impl Visitor for SymbolWriter {
    fn visit_class(&mut self, ast: &Ast, id: NodeId) {
        // Nested classes are not exported
        if id != ast.root() {
            return;
        }

        let super_class = ast
            .super_class(id)
            .map(|class| ast.name(class).to_string())
            .unwrap_or_default();

        self.line(&format!("ClassName: {}", ast.name(id)));
        self.line(&format!("CompilerVersion: {}", COMPILER_VERSION));
        self.line(&format!("ExtendsClass: {}", super_class));
        self.line("");

        for child in ast.children(id) {
            let before = self.output.len();
            accept(self, ast, *child);
            if self.output.len() != before {
                self.line("");
            }
        }
    }

    fn visit_function_group(&mut self, ast: &Ast, id: NodeId) {
        for member in ast.children(id) {
            accept(self, ast, *member);
        }
    }

    fn visit_variable_declaration(&mut self, ast: &Ast, id: NodeId) {
        if let Some(function) = ast.function_of(id) {
            accept(self, ast, function);
            return;
        }

        if let NodeKind::VariableDeclaration { ty } = ast.kind(id) {
            self.line(&format!("Var: {} {}", ast.name(id), type_name(ast, *ty)));
        }
    }

    fn visit_function_declaration(&mut self, ast: &Ast, id: NodeId) {
        let NodeKind::FunctionDeclaration { return_type, .. } = ast.kind(id) else {
            return;
        };

        for param in ast.params(id) {
            if let NodeKind::VariableDeclaration { ty } = ast.kind(*param) {
                self.line(&format!("Arg: {} {}", ast.name(*param), type_name(ast, *ty)));
            }
        }

        let name = ast.parent(id).map(|wrapper| ast.name(wrapper)).unwrap_or_default();
        self.line(&format!("Fun: {} {}", name, return_type.name(ast)));
    }

    fn visit_variable_usage(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_member_access(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_operator(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_function_call(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_number(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_string(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_return(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_if(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_else(&mut self, _ast: &Ast, _id: NodeId) {}

    fn visit_loop(&mut self, _ast: &Ast, _id: NodeId) {}
}
