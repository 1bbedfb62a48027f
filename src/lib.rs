#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A location in a source file: byte offset, 1-based line and file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(offset: u32, line: u32, file: Rc<String>) -> Self {
        Position { offset, line, file }
    }

    pub fn null() -> Self {
        Position {
            offset: 0,
            line: 0,
            file: Rc::new(String::from("<null>")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    /// Span running from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Finds the line containing `position` in `source`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line, or `None` when `position` is past the end.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    None
}

/// Renders a diagnostic with the offending source line and a caret.
///
/// ```text
/// Error: MissingClosing (array missing closing ']', while parsing array)
/// -> main.kes
///    |
/// 20 | let a = [1, 2
///    | -------------^
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let mut out = String::new();

    let tip = error.get_tip();
    let header = match (&tip, error.get_context()) {
        (ErrorTip::None, None) => format!("Error: {}", error.get_error_name()),
        (ErrorTip::None, Some(context)) => {
            format!("Error: {} (while parsing {})", error.get_error_name(), context)
        }
        (_, None) => format!("Error: {} ({})", error.get_error_name(), tip),
        (_, Some(context)) => format!(
            "Error: {} ({}, while parsing {})",
            error.get_error_name(),
            tip,
            context
        ),
    };
    out.push_str(&header);
    out.push('\n');
    out.push_str(&format!("-> {}\n", position.file));

    // End-of-input errors point one past the last byte
    let lookup = if position.offset as usize >= source.len() && !source.is_empty() {
        source.len() as u32 - 1
    } else {
        position.offset
    };

    let Some((line, line_text, line_pos)) = get_line_at_position(source, lookup) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();
    (String::from(&string[start..]), start)
}
