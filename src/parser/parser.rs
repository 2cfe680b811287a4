//! Parser implementation for building the Abstract Syntax Tree.
//!
//! The parser reads one logical line at a time from a [`TokenSource`]
//! through a three token window. Each line is placed into the tree by the
//! block assembly rules in [`super::blocks`] and then dispatched to a
//! statement handler.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for primary expressions
//! - LED (left denotation) handlers for operators
//! - Binding powers for operator precedence
//! - Type parsing handlers

use std::{
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, NodeId},
        nodes::NodeKind,
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    lexer::{
        stream::{TokenSource, TokenStream},
        tokens::{Token, TokenKind},
    },
    type_checker::type_checker::resolve_superclasses,
    Position,
};

use super::{
    blocks::parent_for_new_line,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Number of tokens the parser can look at without consuming them.
pub const LOOKAHEAD: usize = 3;

/// What happened to a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line was handled, whether or not it produced a node.
    Parsed,
    /// Empty or comment-only line.
    Blank,
    /// A structural error was reported and the rest of the line dropped.
    Skipped,
    /// Indented under a line that was rejected, dropped with it.
    Dropped,
    /// End of input.
    Finished,
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    source: Box<dyn TokenSource>,
    window: VecDeque<Token>,
    /// The name of the source file being parsed
    file: Rc<String>,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    type_nud_lookup: TypeNUDLookup,
    ast: Ast,
    diagnostics: Diagnostics,
    /// Node inserted by the most recent line, used to place the next one.
    last_inserted: Option<NodeId>,
    /// Indentation of the last rejected line while its block is being dropped.
    discarded_indent: Option<u32>,
    /// Indentation of the line being parsed.
    line_indent: u32,
    /// True until the first line that is not a file type declaration.
    in_header: bool,
    /// Counter for generating hidden variable names
    hidden_counter: u32,
}

impl Parser {
    /// Creates a parser whose tree is rooted at a class named `class_name`.
    pub fn new(source: Box<dyn TokenSource>, file: Rc<String>, class_name: &str) -> Self {
        let mut parser = Parser {
            source,
            window: VecDeque::with_capacity(LOOKAHEAD),
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            ast: Ast::new(class_name),
            diagnostics: Diagnostics::new(),
            last_inserted: None,
            discarded_indent: None,
            line_indent: 0,
            in_header: true,
            hidden_counter: 0,
        };
        parser.fill();
        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);
        parser
    }

    fn fill(&mut self) {
        while self.window.len() < LOOKAHEAD {
            let token = self.source.next_token();
            self.window.push_back(token);
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.window[0]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.window[0].kind
    }

    /// Kind of the token `offset` places ahead of the current one.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.window
            .get(offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Consumes the current token and returns it.
    pub fn advance(&mut self) -> Token {
        let token = self
            .window
            .pop_front()
            .unwrap_or_else(|| unreachable!("token window is never empty"));
        self.fill();
        trace!("consumed {}", token.debug());
        token
    }

    /// Builds an `UnexpectedToken` error for the current token.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.to_string(),
            },
            self.get_position(),
        )
        .with_context(expected, token.to_string())
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(error.unwrap_or_else(|| self.unexpected(&expected_kind.to_string())));
        }

        Ok(self.advance())
    }

    /// Expects a token of the specified kind, naming the expected construct.
    pub fn expect(&mut self, expected_kind: TokenKind, expected: &str) -> Result<Token, Error> {
        let error = self.unexpected(expected);
        self.expect_error(expected_kind, Some(error))
    }

    /// Consumes the end of the current line.
    pub fn finish_line(&mut self) -> Result<(), Error> {
        match self.current_token_kind() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::EOF => Ok(()),
            TokenKind::CloseParen => Err(Error::new(
                ErrorImpl::UnmatchedParenthesis,
                self.get_position(),
            )
            .with_context("end of line", ")")),
            _ => Err(self.unexpected("end of line")),
        }
    }

    /// Drops the remaining tokens of the current line.
    pub fn skip_line(&mut self) {
        while !self.current_token_kind().is_line_end() {
            self.advance();
        }

        if self.current_token_kind() == TokenKind::Newline {
            self.advance();
        }
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (operator) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (primary) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        Position(self.current_token().line, Rc::clone(&self.file))
    }

    pub fn position_at(&self, line: u32) -> Position {
        Position(line, Rc::clone(&self.file))
    }

    pub fn line_indent(&self) -> u32 {
        self.line_indent
    }

    pub fn in_header(&self) -> bool {
        self.in_header
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Records a diagnostic without interrupting the parse.
    pub fn report(&mut self, error: Error) {
        self.diagnostics.push(error);
    }

    /// Allocates a detached node on the current line.
    pub fn alloc(&mut self, kind: NodeKind, name: impl Into<String>, line: u32) -> NodeId {
        self.ast.alloc(kind, name, line, self.line_indent)
    }

    /// Generates a fresh name that cannot collide with source identifiers.
    pub fn hidden_name(&mut self, prefix: &str) -> String {
        let name = format!("${}{}", prefix, self.hidden_counter);
        self.hidden_counter += 1;
        name
    }

    /// Parses one logical line and inserts its node into the tree.
    pub fn parse_line(&mut self) -> LineOutcome {
        let indent = if self.current_token_kind() == TokenKind::Indent {
            self.advance().indent
        } else {
            0
        };

        match self.current_token_kind() {
            TokenKind::EOF => return LineOutcome::Finished,
            TokenKind::Newline => {
                self.advance();
                return LineOutcome::Blank;
            }
            _ => {}
        }

        // The body of a rejected line goes with it
        if let Some(column) = self.discarded_indent {
            if indent > column {
                debug!("line {}: dropped with rejected block", self.current_token().line);
                self.skip_line();
                return LineOutcome::Dropped;
            }
            self.discarded_indent = None;
        }

        if self.current_token_kind() != TokenKind::FileType {
            self.in_header = false;
        }

        self.line_indent = indent;
        let result = parent_for_new_line(&self.ast, self.last_inserted, indent, self.get_position())
            .and_then(|parent| parse_stmt(self, parent));

        match result {
            Ok(Some(node)) => {
                debug!(
                    "line {}: inserted {} {:?}",
                    self.ast.node(node).line,
                    self.ast.kind(node).describe(),
                    node
                );
                self.last_inserted = Some(node);
                LineOutcome::Parsed
            }
            Ok(None) => {
                self.discarded_indent = Some(indent);
                LineOutcome::Parsed
            }
            Err(error) => {
                self.report(error);
                self.skip_line();
                self.discarded_indent = Some(indent);
                LineOutcome::Skipped
            }
        }
    }

    /// Parses every line of the input, then resolves `extends` clauses.
    ///
    /// Statement level errors are collected in the diagnostics; the returned
    /// error aborts the whole file.
    pub fn parse_file(&mut self) -> Result<(), Error> {
        debug!("parsing {}", self.file);

        while self.parse_line() != LineOutcome::Finished {}

        if let Some(token) = self.window.iter().find(|token| token.kind != TokenKind::EOF) {
            return Err(Error::new(
                ErrorImpl::UnparsedTrailingTokens {
                    token: token.to_string(),
                },
                Position(token.line, Rc::clone(&self.file)),
            )
            .with_context("end of input", token.to_string()));
        }

        resolve_superclasses(&mut self.ast, &self.file, &mut self.diagnostics);
        Ok(())
    }

    pub fn into_parts(self) -> (Ast, Diagnostics) {
        (self.ast, self.diagnostics)
    }
}

/// Parses a stream of tokens into a tree rooted at class `class_name`.
///
/// This is the main entry point for parsing. A file level failure is
/// appended to the returned diagnostics.
pub fn parse(tokens: Vec<Token>, file: Rc<String>, class_name: &str) -> (Ast, Diagnostics) {
    let mut parser = Parser::new(Box::new(TokenStream::new(tokens)), file, class_name);

    if let Err(error) = parser.parse_file() {
        parser.report(error);
    }

    parser.into_parts()
}
