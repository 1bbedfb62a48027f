//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Interning of identifier and string text
//! - Token position tracking (offset and line) for error reporting
//! - Comments and whitespace handling

pub mod interner;
pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
