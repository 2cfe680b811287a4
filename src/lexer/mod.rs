//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Line-by-line tokenization using regex patterns
//! - Indentation measurement (`Indent` tokens) and line ends (`Newline`)
//! - Recognition of keywords, symbols, literals, and operators
//! - Comments and whitespace handling
//!
//! The parser only depends on the [`stream::TokenSource`] trait.

pub mod lexer;
pub mod stream;
pub mod tokens;
