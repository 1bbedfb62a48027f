//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String literals with escape sequences
//! - Operators, punctuation and the fork marker
//! - Comments, line tracking and error cases

use std::rc::Rc;

use super::{
    interner::Interner,
    lexer::{tokenize, Lexer},
    tokens::{TokenKind, TokenValue},
};
use crate::errors::errors::ErrorImpl;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.kes".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("let type def if unless else while until return end not"),
        vec![
            TokenKind::Let,
            TokenKind::Type,
            TokenKind::Def,
            TokenKind::If,
            TokenKind::Unless,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Until,
            TokenKind::Return,
            TokenKind::End,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore CamelCase ending".to_string();
    let tokens = tokenize(source, Some("test.kes".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].payload, TokenValue::Text(Rc::from("foo")));
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    assert_eq!(tokens[4].value, "CamelCase");
    // keyword prefix does not make a keyword
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 2.5 0 100.5".to_string();
    let tokens = tokenize(source, None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].payload, TokenValue::Int(42));
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].payload, TokenValue::Float(2.5));
    assert_eq!(tokens[2].payload, TokenValue::Int(0));
    assert_eq!(tokens[3].payload, TokenValue::Float(100.5));
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_integer_overflow_is_an_error() {
    let error = tokenize("99999999999999999999".to_string(), None).unwrap_err();

    assert!(matches!(error.get_impl(), ErrorImpl::NumberParseError { .. }));
}

#[test]
fn test_tokenize_strings_with_escapes() {
    let source = r#""hello" "tab\there" "quote\"d" "\x41\n""#.to_string();
    let tokens = tokenize(source, None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].as_text().as_ref(), "hello");
    assert_eq!(tokens[1].as_text().as_ref(), "tab\there");
    assert_eq!(tokens[2].as_text().as_ref(), "quote\"d");
    assert_eq!(tokens[3].as_text().as_ref(), "A\n");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("** * *= ++ + += -- - -= / /= % << >> <= < >= > == = != ! ~ ^ | || ||= && &&="),
        vec![
            TokenKind::StarStar,
            TokenKind::Star,
            TokenKind::StarEquals,
            TokenKind::PlusPlus,
            TokenKind::Plus,
            TokenKind::PlusEquals,
            TokenKind::MinusMinus,
            TokenKind::Dash,
            TokenKind::MinusEquals,
            TokenKind::Slash,
            TokenKind::SlashEquals,
            TokenKind::Percent,
            TokenKind::ShiftLeft,
            TokenKind::ShiftRight,
            TokenKind::LessEquals,
            TokenKind::Less,
            TokenKind::GreaterEquals,
            TokenKind::Greater,
            TokenKind::Equals,
            TokenKind::Assignment,
            TokenKind::NotEquals,
            TokenKind::Bang,
            TokenKind::Tilde,
            TokenKind::Caret,
            TokenKind::Pipe,
            TokenKind::Or,
            TokenKind::OrEquals,
            TokenKind::And,
            TokenKind::AndEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_ampersand_is_fork_at_end_of_line() {
    assert_eq!(
        kinds("a & b"),
        vec![TokenKind::Identifier, TokenKind::Ampersand, TokenKind::Identifier, TokenKind::EOF]
    );
    assert_eq!(kinds("a & "), vec![TokenKind::Identifier, TokenKind::Fork, TokenKind::EOF]);
    assert_eq!(
        kinds("a &\nb"),
        vec![TokenKind::Identifier, TokenKind::Fork, TokenKind::Identifier, TokenKind::EOF]
    );
    assert_eq!(
        kinds("(a &)"),
        vec![
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Fork,
            TokenKind::CloseParen,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("# a comment\nx # trailing\n"),
        vec![TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_lines_are_tracked() {
    let tokens = tokenize("a\n  b\n\nc".to_string(), Some("lines.kes".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[1].span.start.line, 2);
    assert_eq!(tokens[1].span.start.offset, 4);
    assert_eq!(tokens[2].span.start.line, 4);
    assert_eq!(tokens[2].span.start.file.as_str(), "lines.kes");
}

#[test]
fn test_cursor_position_follows_tokens() {
    let mut lexer = Lexer::new("x = 12\n3.5".to_string(), Some("pos.kes".to_string()));
    assert_eq!(lexer.get_position().offset, 0);

    let int = lexer.nth(2).unwrap().unwrap();
    assert_eq!(int.kind, TokenKind::Int);
    assert_eq!(int.span.start.offset, 4);
    assert_eq!(lexer.get_position().offset, 6);

    let float = lexer.next().unwrap().unwrap();
    assert_eq!(float.kind, TokenKind::Float);
    assert_eq!(float.span.start.line, 2);
    assert_eq!(lexer.get_position().line, 2);
    assert_eq!(lexer.get_position().file.as_str(), "pos.kes");
}

#[test]
fn test_unrecognised_character() {
    let error = tokenize("a = @".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().offset, 4);
}

#[test]
fn test_lexer_stops_after_eof() {
    let mut lexer = Lexer::new("x".to_string(), None);

    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Identifier);
    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::EOF);
    assert!(lexer.next().is_none());
}

#[test]
fn test_identifiers_are_interned() {
    let mut lexer = Lexer::new("foo bar foo \"foo\"".to_string(), None);
    let tokens = lexer.by_ref().collect::<Result<Vec<_>, _>>().unwrap();

    let (TokenValue::Text(first), TokenValue::Text(third)) = (&tokens[0].payload, &tokens[2].payload) else {
        panic!("expected identifier payloads");
    };
    assert!(Rc::ptr_eq(first, third));
    assert_eq!(lexer.interner().len(), 2);
}

#[test]
fn test_interner_reuses_strings() {
    let mut interner = Interner::new();
    assert!(interner.is_empty());

    let first = interner.intern("foo bar baz");
    let second = interner.intern("foo bar baz");
    assert!(Rc::ptr_eq(&first, &second));

    for _ in 0..200 {
        interner.intern("foo");
    }
    assert_eq!(interner.len(), 2);
}
