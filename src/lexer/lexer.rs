use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    config::CompilerOptions,
    errors::errors::{Error, ErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("lexer pattern must compile"),
        handler,
    }
}

lazy_static! {
    // Order matters: longer operators must be tried before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("^[0-9]+(\\.[0-9]+)?", number_handler),
        pattern("^[ \\t]+", skip_handler),
        pattern("^\"(\\\\.|[^\"\\\\])*\"", string_handler),
        pattern("^`[^`]*`", inline_literal_handler),
        pattern("^//.*", skip_handler),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("^=>", MK_DEFAULT_HANDLER!(TokenKind::FatArrow, "=>")),
        pattern("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("^\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("^\\+\\+", MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++")),
        pattern("^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern("^--", MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--")),
        pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

/// Line-oriented tokenizer state.
///
/// Each source line is measured for indentation first, then matched against
/// the pattern table from its first non-blank character.
pub struct Lexer {
    tokens: Vec<Token>,
    line_text: String,
    pos: usize,
    pub line: u32,
    pub indent: u32,
    file: Rc<String>,
    tab_width: u32,
}

impl Lexer {
    pub fn new(file: Option<String>, tab_width: u32) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            line_text: String::new(),
            pos: 0,
            line: 0,
            indent: 0,
            file: file_name,
            tab_width,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.line_text[self.pos..]
    }

    pub fn at_line_end(&self) -> bool {
        self.pos >= self.line_text.len()
    }

    fn push_kind(&mut self, kind: TokenKind, value: String) {
        let token = MK_TOKEN!(kind, value, self.line, self.indent);
        self.push(token);
    }

    /// Measures the leading whitespace of `text` and positions the lexer after it.
    fn start_line(&mut self, line: u32, text: &str) {
        self.line = line;
        self.line_text = text.trim_end_matches('\r').to_string();
        self.indent = 0;
        self.pos = 0;

        for c in self.line_text.chars() {
            match c {
                ' ' => self.indent += 1,
                '\t' => self.indent += self.tab_width,
                _ => break,
            }
            self.pos += 1;
        }
    }

    fn is_blank(&self) -> bool {
        let rest = self.remainder();
        rest.is_empty() || rest.starts_with("//")
    }

    fn lex_line(&mut self) -> Result<(), Error> {
        while !self.at_line_end() {
            let mut matched = None;

            for pattern in PATTERNS.iter() {
                if pattern.regex.is_match(self.remainder()) {
                    matched = Some(pattern);
                    break;
                }
            }

            match matched {
                Some(pattern) => (pattern.handler)(self, &pattern.regex),
                None => {
                    let token = self.remainder().chars().next().unwrap_or(' ').to_string();
                    return Err(Error::new(
                        ErrorImpl::UnrecognisedToken { token: token.clone() },
                        Position(self.line, Rc::clone(&self.file)),
                    )
                    .with_context("token", token));
                }
            }
        }

        Ok(())
    }
}

fn matched_text(lexer: &Lexer, regex: &Regex) -> String {
    regex
        .find(lexer.remainder())
        .map(|found| found.as_str().to_string())
        .unwrap_or_default()
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    lexer.advance_n(matched.len());
    lexer.push_kind(TokenKind::Number, matched);
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    lexer.advance_n(matched.len());
}

fn inline_literal_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    lexer.advance_n(matched.len());
    lexer.push_kind(
        TokenKind::InlineLiteral,
        matched[1..matched.len() - 1].to_string(),
    );
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    lexer.advance_n(matched.len());

    let string_literal = &matched[1..matched.len() - 1];
    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                let mut hex = String::new();
                chars.next();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push('x');
                        result.push_str(&hex);
                    }
                }
            }
            _ => result.push(ch), // Keep the backslash
        }
    }

    lexer.push_kind(TokenKind::String, result);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = matched_text(lexer, regex);
    lexer.advance_n(value.len());

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Symbol);
    lexer.push_kind(kind, value);
}

/// Tokenizes `source` with the default options.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    tokenize_with(source, file, &CompilerOptions::default())
}

/// Tokenizes `source` into indentation-aware lines.
///
/// Every non-blank line yields an optional `Indent` token, its content tokens
/// and a `Newline`. Blank and comment-only lines yield a bare `Newline`. The
/// stream always ends with `EOF`.
pub fn tokenize_with(
    source: String,
    file: Option<String>,
    options: &CompilerOptions,
) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(file, options.tab_width);
    let mut last_line = 0;

    for (index, text) in source.lines().enumerate() {
        let line = index as u32 + 1;
        last_line = line;
        lex.start_line(line, text);

        if lex.is_blank() {
            lex.indent = 0;
            lex.push_kind(TokenKind::Newline, String::from("\n"));
            continue;
        }

        if lex.indent > 0 {
            lex.push_kind(TokenKind::Indent, String::new());
        }

        lex.lex_line()?;
        lex.push_kind(TokenKind::Newline, String::from("\n"));
    }

    lex.push(Token::eof(last_line + 1));
    Ok(lex.tokens)
}
