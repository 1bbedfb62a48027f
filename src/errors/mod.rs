//! Error types and error handling for the front end.
//!
//! This module defines the diagnostics produced while tokenizing and
//! parsing. It includes:
//!
//! - Error structures with source position and parse context
//! - Specific error variants for every "expected construct missing" case
//! - Helpful tips for rendering

pub mod errors;

#[cfg(test)]
mod tests;
