//! File driver.
//!
//! A [`Session`] reads a source file, tokenizes and parses it into its own
//! [`Ast`], then follows the file's imports. `import a.b` refers to the file
//! `a/b.<extension>` next to the importing file. Every file is parsed at most
//! once per session, which also makes import cycles harmless.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    rc::Rc,
    time::Instant,
};

use log::{debug, info};

use crate::{
    ast::{
        ast::Ast,
        nodes::{ImportSymbols, NodeKind},
    },
    config::{CompilerOptions, Emit},
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    lexer::lexer::tokenize_with,
    parser::parser::parse,
    Position,
};

use super::{printer::print_tree, sym::write_symbols};

/// One parsed source file.
pub struct CompiledFile {
    pub path: PathBuf,
    pub source: String,
    pub ast: Ast,
    pub diagnostics: Diagnostics,
}

impl CompiledFile {
    /// File name used in positions and output names.
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

struct Import {
    package: Vec<String>,
    symbols: ImportSymbols,
    line: u32,
}

pub struct Session {
    options: CompilerOptions,
    files: Vec<CompiledFile>,
    index: HashMap<PathBuf, usize>,
}

impl Session {
    pub fn new(options: CompilerOptions) -> Self {
        Session {
            options,
            files: vec![],
            index: HashMap::new(),
        }
    }

    pub fn files(&self) -> &[CompiledFile] {
        &self.files
    }

    pub fn file(&self, index: usize) -> &CompiledFile {
        &self.files[index]
    }

    /// The already parsed file at `path`, if any.
    pub fn lookup(&self, path: &Path) -> Option<&CompiledFile> {
        self.index.get(&normalize(path)).map(|index| &self.files[*index])
    }

    pub fn has_errors(&self) -> bool {
        self.files.iter().any(CompiledFile::has_errors)
    }

    /// Parses `path` and everything it imports, returning the file's index.
    ///
    /// Failing to read or tokenize the file itself is an error; problems in
    /// imported files end up in the importing file's diagnostics.
    pub fn compile(&mut self, path: &Path) -> Result<usize, Error> {
        let key = normalize(path);
        if let Some(index) = self.index.get(&key) {
            debug!("{} already parsed", key.display());
            return Ok(*index);
        }

        let name = file_name(path);
        let source = fs::read_to_string(path).map_err(|error| {
            Error::new(
                ErrorImpl::UnreadableFile {
                    path: path.display().to_string(),
                    message: error.to_string(),
                },
                Position(0, Rc::new(name.clone())),
            )
            .with_context("a readable source file", error.to_string())
        })?;

        let start = Instant::now();
        let tokens = tokenize_with(source.clone(), Some(name.clone()), &self.options)?;
        info!("Tokenized {} in {:?}", name, start.elapsed());

        let parse_start = Instant::now();
        let (ast, diagnostics) = parse(tokens, Rc::new(name.clone()), &class_name(path));
        info!("Parsed {} in {:?}", name, parse_start.elapsed());

        let imports = collect_imports(&ast);
        let index = self.files.len();
        self.files.push(CompiledFile {
            path: path.to_path_buf(),
            source,
            ast,
            diagnostics,
        });
        self.index.insert(key, index);

        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        for import in imports {
            let import_diagnostics = self.resolve_import(&directory, &name, import);
            self.files[index].diagnostics.extend(import_diagnostics);
        }

        Ok(index)
    }

    fn resolve_import(&mut self, directory: &Path, importer: &str, import: Import) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let package = import.package.join(".");
        let position = Position(import.line, Rc::new(importer.to_string()));

        let mut target = directory.to_path_buf();
        target.extend(&import.package);
        target.set_extension(&self.options.extension);

        if !target.is_file() {
            diagnostics.push(
                Error::new(ErrorImpl::ImportNotFound { package: package.clone() }, position)
                    .with_context(target.display().to_string(), package),
            );
            return diagnostics;
        }

        debug!("{} imports {}", importer, target.display());
        let imported = match self.compile(&target) {
            Ok(imported) => imported,
            Err(error) => {
                diagnostics.push(error);
                return diagnostics;
            }
        };

        if let ImportSymbols::Explicit(symbols) = import.symbols {
            let ast = &self.files[imported].ast;
            for symbol in symbols {
                if ast.declared_in(ast.root(), &symbol).is_none() {
                    diagnostics.push(
                        Error::new(
                            ErrorImpl::ImportNotFound {
                                package: format!("{}.{}", package, symbol),
                            },
                            position.clone(),
                        )
                        .with_context(format!("a declaration in {}", package), symbol),
                    );
                }
            }
        }

        diagnostics
    }

    /// Renders the configured artifact for a parsed file.
    pub fn render(&self, index: usize) -> String {
        let ast = &self.files[index].ast;
        match self.options.emit {
            Emit::Tree => print_tree(ast),
            Emit::Sym => write_symbols(ast),
        }
    }

    /// Writes the configured artifact into the output directory.
    pub fn emit(&self, index: usize) -> io::Result<PathBuf> {
        let file = &self.files[index];
        let extension = match self.options.emit {
            Emit::Tree => "tree",
            Emit::Sym => "sym",
        };

        fs::create_dir_all(&self.options.output_dir)?;
        let output = self
            .options
            .output_dir
            .join(format!("{}.{}", class_name(&file.path), extension));
        fs::write(&output, self.render(index))?;

        info!("Wrote {}", output.display());
        Ok(output)
    }
}

fn collect_imports(ast: &Ast) -> Vec<Import> {
    ast.descendants(ast.root())
        .into_iter()
        .filter_map(|id| match ast.kind(id) {
            NodeKind::ImportExpression { package, symbols } => Some(Import {
                package: package.clone(),
                symbols: symbols.clone(),
                line: ast.node(id).line,
            }),
            _ => None,
        })
        .collect()
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Root classes are named after the file stem.
fn class_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("Main"))
}
