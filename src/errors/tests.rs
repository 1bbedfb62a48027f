//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position::new(offset, 1, Rc::new("test.kes".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert!(error.get_context().is_none());
}

#[test]
fn test_error_position() {
    let error = Error::new(ErrorImpl::MissingRightHand, at(42));

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().line, 1);
}

#[test]
fn test_missing_closing_message() {
    let error = Error::new(
        ErrorImpl::MissingClosing {
            construct: "array",
            delimiter: "]",
        },
        at(0),
    );

    assert_eq!(error.message(), "array missing closing ']'");
    assert_eq!(error.to_string(), "array missing closing ']'");
    assert_eq!(error.get_error_name(), "MissingClosing");
}

#[test]
fn test_missing_message() {
    let error = Error::new(ErrorImpl::Missing { what: "function name" }, at(0));

    assert_eq!(error.message(), "missing function name");
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_context_is_attached() {
    let error = Error::new(ErrorImpl::MissingRightHand, at(3)).with_context(Some("additive operation"));

    assert_eq!(error.get_context(), Some("additive operation"));
    assert_eq!(error.message(), "missing right-hand expression");
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(ErrorImpl::MissingNewline, at(0));

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("own line")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_too_deeply_nested_error() {
    let error = Error::new(ErrorImpl::TooDeeplyNested { limit: 8 }, at(0));

    assert_eq!(error.get_error_name(), "TooDeeplyNested");
    assert_eq!(error.message(), "expression nested too deeply (limit 8)");
}
