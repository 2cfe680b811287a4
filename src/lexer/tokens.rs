use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("class", TokenKind::Class);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("loop", TokenKind::Loop);
        map.insert("return", TokenKind::Return);
        map.insert("extends", TokenKind::Extends);
        map.insert("import", TokenKind::Import);
        map.insert("from", TokenKind::From);
        map.insert("filetype", TokenKind::FileType);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Newline,
    Indent,
    Number,
    String,
    Symbol,
    InlineLiteral,

    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Colon,
    Comma,
    Arrow,    // ->
    FatArrow, // =>

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Var,
    Class,
    If,
    Else,
    Loop,
    Return,
    Extends,
    Import,
    From,
    FileType,
}

impl TokenKind {
    /// True for tokens that end a logical line.
    pub fn is_line_end(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::EOF)
    }

    /// True for tokens that may start a primary expression.
    pub fn starts_primary(&self) -> bool {
        matches!(
            self,
            TokenKind::Symbol
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::InlineLiteral
                | TokenKind::OpenParen
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::Equals
                | TokenKind::Not
                | TokenKind::NotEquals
                | TokenKind::Less
                | TokenKind::LessEquals
                | TokenKind::Greater
                | TokenKind::GreaterEquals
                | TokenKind::Or
                | TokenKind::And
                | TokenKind::Dot
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Plus
                | TokenKind::Dash
                | TokenKind::Slash
                | TokenKind::Star
                | TokenKind::Percent
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: u32,
    /// Indentation of the line this token belongs to.
    pub indent: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::EOF => write!(f, "end of file"),
            TokenKind::Indent => write!(f, "indent {}", self.indent),
            _ => write!(f, "{}", self.value),
        }
    }
}

impl Token {
    pub fn eof(line: u32) -> Self {
        Token {
            kind: TokenKind::EOF,
            value: String::from("EOF"),
            line,
            indent: 0,
        }
    }

    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Symbol,
            TokenKind::Number,
            TokenKind::InlineLiteral,
        ]) {
            format!("{} ({})", self.kind, self.value)
        } else if self.kind == TokenKind::Indent {
            format!("{} ({})", self.kind, self.indent)
        } else {
            format!("{} ()", self.kind)
        }
    }
}
