//! Indented debug rendering of a tree, one node per line.

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::{ImportSymbols, NodeKind, NumberLiteral},
        visitor::{accept, walk_children, Visitor},
    },
    type_checker::type_checker::type_of,
};

#[derive(Default)]
pub struct TreePrinter {
    output: String,
    depth: usize,
}

pub fn print_tree(ast: &Ast) -> String {
    let mut printer = TreePrinter::default();
    accept(&mut printer, ast, ast.root());
    printer.output
}

impl TreePrinter {
    fn line(&mut self, text: String) {
        self.output.push_str(&"  ".repeat(self.depth));
        self.output.push_str(&text);
        self.output.push('\n');
    }

    fn nested(&mut self, ast: &Ast, id: NodeId, text: String) {
        self.line(text);
        self.depth += 1;
        walk_children(self, ast, id);
        self.depth -= 1;
    }
}

fn typed(ast: &Ast, id: NodeId) -> String {
    type_of(ast, id)
        .map(|ty| ty.name(ast))
        .unwrap_or_else(|| String::from("?"))
}

impl Visitor for TreePrinter {
    fn visit_class(&mut self, ast: &Ast, id: NodeId) {
        let text = match ast.super_class(id) {
            Some(base) => format!("class {} extends {}", ast.name(id), ast.name(base)),
            None => format!("class {}", ast.name(id)),
        };
        self.nested(ast, id, text);
    }

    fn visit_function_group(&mut self, ast: &Ast, id: NodeId) {
        self.nested(ast, id, format!("function group {}", ast.name(id)));
    }

    fn visit_variable_declaration(&mut self, ast: &Ast, id: NodeId) {
        self.nested(ast, id, format!("var {}: {}", ast.name(id), typed(ast, id)));
    }

    fn visit_function_declaration(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::FunctionDeclaration { return_type, .. } = ast.kind(id) {
            let text = format!("function {} -> {}", ast.name(id), return_type.name(ast));
            self.nested(ast, id, text);
        }
    }

    fn visit_variable_usage(&mut self, ast: &Ast, id: NodeId) {
        self.line(format!("usage {}: {}", ast.name(id), typed(ast, id)));
    }

    fn visit_member_access(&mut self, ast: &Ast, id: NodeId) {
        self.nested(ast, id, format!("member .{}: {}", ast.name(id), typed(ast, id)));
    }

    fn visit_operator(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::Operator { operator } = ast.kind(id) {
            self.nested(ast, id, format!("operator {}", operator));
        }
    }

    fn visit_function_call(&mut self, ast: &Ast, id: NodeId) {
        self.nested(ast, id, format!("call: {}", typed(ast, id)));
    }

    fn visit_number(&mut self, ast: &Ast, id: NodeId) {
        match ast.kind(id) {
            NodeKind::Number(NumberLiteral::Int(value)) => self.line(format!("number {}", value)),
            NodeKind::Number(NumberLiteral::Double(value)) => {
                self.line(format!("number {:?}", value))
            }
            _ => {}
        }
    }

    fn visit_string(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::String(value) = ast.kind(id) {
            self.line(format!("string {:?}", value));
        }
    }

    fn visit_return(&mut self, ast: &Ast, id: NodeId) {
        self.nested(ast, id, String::from("return"));
    }

    fn visit_if(&mut self, ast: &Ast, id: NodeId) {
        self.nested(ast, id, String::from("if"));
    }

    fn visit_else(&mut self, ast: &Ast, id: NodeId) {
        self.nested(ast, id, String::from("else"));
    }

    fn visit_loop(&mut self, ast: &Ast, id: NodeId) {
        let text = match ast.kind(id) {
            NodeKind::Loop { desugared: true } => "loop (counted)",
            _ => "loop",
        };
        self.nested(ast, id, String::from(text));
    }

    fn visit_inline_literal(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::InlineLiteral(code) = ast.kind(id) {
            self.line(format!("inline `{}`", code));
        }
    }

    fn visit_file_type(&mut self, ast: &Ast, id: NodeId) {
        self.line(format!("filetype {}", ast.name(id)));
    }

    fn visit_import(&mut self, ast: &Ast, id: NodeId) {
        if let NodeKind::ImportExpression { symbols, .. } = ast.kind(id) {
            let text = match symbols {
                ImportSymbols::Wildcard => format!("import {}", ast.name(id)),
                ImportSymbols::Explicit(names) => {
                    format!("from {} import {}", ast.name(id), names.join(", "))
                }
            };
            self.line(text);
        }
    }

    fn visit_subclass(&mut self, ast: &Ast, id: NodeId) {
        self.line(format!("extends {}", ast.name(id)));
    }
}
