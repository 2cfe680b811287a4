use std::vec::IntoIter;

use super::tokens::Token;

/// A producer of tokens for the parser.
///
/// Once the input is exhausted the source keeps returning `EOF`.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// Token source backed by an already tokenized buffer.
pub struct TokenStream {
    tokens: IntoIter<Token>,
    last_line: u32,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens: tokens.into_iter(),
            last_line: 1,
        }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.last_line = token.line;
                token
            }
            None => Token::eof(self.last_line),
        }
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        TokenStream::new(tokens)
    }
}
