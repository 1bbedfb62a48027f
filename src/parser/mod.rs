//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the recursive descent parser that transforms a
//! stream of tokens into the program tree. It handles:
//!
//! - Statement parsing (conditionals, loops, functions, type declarations)
//! - Expression parsing over a fixed precedence ladder
//! - Type names in annotations and declarations
//! - Error reporting, where the first recorded error wins
//!
//! Binary levels are described by `BindingPower` and folded by one generic
//! function; statements are dispatched through a lookup table keyed on the
//! first token.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
