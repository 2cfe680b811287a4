//! Token construction shorthands for the lexer's pattern table.

/// Builds a [`Token`](crate::lexer::tokens::Token) on `$line` whose line is
/// indented by `$indent` columns.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), 3, 4);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $line:expr, $indent:expr) => {
        Token {
            kind: $kind,
            value: $value,
            line: $line,
            indent: $indent,
        }
    };
}

/// Creates a default lexer handler for fixed-text token patterns.
///
/// Generates a handler that pushes a token of the given kind and advances
/// the lexer past the token's text.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let token = MK_TOKEN!($kind, String::from($value), lexer.line, lexer.indent);
            lexer.push(token);
            lexer.advance_n($value.len());
        }
    };
}
