//! Unit tests for the parser module.
//!
//! This module contains tests for:
//! - The token cursor and the recorded-error state
//! - The expression precedence ladder, calls, dot chains and literals
//! - Control flow, function and type declarations
//! - Diagnostics and the context they are reported in

use pretty_assertions::assert_eq;

use super::parser::{parse, parse_source, parse_with_options, Parser, ParserOptions};
use crate::{
    ast::ast::Node,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
};

fn tokens(source: &str) -> Vec<Token> {
    tokenize(source.to_string(), Some("test.kes".to_string())).unwrap()
}

fn parser_for(source: &str) -> Parser<std::vec::IntoIter<Token>> {
    Parser::new(tokens(source).into_iter(), ParserOptions::default())
}

/// One S-expression per top-level statement.
fn dump(source: &str) -> String {
    let block = parse_source(source, "test.kes").unwrap();
    block
        .iter()
        .map(|node| node.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn error_of(source: &str) -> Error {
    parse_source(source, "test.kes").unwrap_err()
}

// Token cursor

#[test]
fn test_cursor_peek_accept_and_prev() {
    let mut parser = parser_for("a + 1");

    assert_eq!(parser.peek_kind(), TokenKind::Identifier);
    assert_eq!(parser.peek_kind(), TokenKind::Identifier);
    assert!(parser.accept(TokenKind::Plus).is_none());
    assert!(parser.is(TokenKind::Identifier));

    assert!(parser.accept(TokenKind::Identifier).is_some());
    assert_eq!(parser.prev().map(|token| token.value.as_str()), Some("a"));

    // advance does not replace the accepted token
    assert_eq!(parser.advance().kind, TokenKind::Plus);
    assert_eq!(parser.prev().map(|token| token.value.as_str()), Some("a"));

    assert_eq!(
        parser.accept_any(&[TokenKind::Float, TokenKind::Int]),
        Some(TokenKind::Int)
    );
    assert_eq!(parser.prev().and_then(|token| token.as_int()), Some(1));
}

#[test]
fn test_cursor_keeps_producing_eof() {
    let mut parser = parser_for("x");

    assert_eq!(parser.advance().kind, TokenKind::Identifier);
    assert_eq!(parser.advance().kind, TokenKind::EOF);
    assert!(parser.is(TokenKind::EOF));
    assert!(parser.accept(TokenKind::EOF).is_some());
    assert_eq!(parser.advance().kind, TokenKind::EOF);
}

#[test]
fn test_cursor_on_empty_source() {
    let mut parser = Parser::new(Vec::<Token>::new().into_iter(), ParserOptions::default());
    assert!(parser.is(TokenKind::EOF));

    let (_, result) = parse(Vec::<Token>::new());
    assert!(result.unwrap().is_empty());
}

#[test]
fn test_first_recorded_error_wins() {
    let mut parser = parser_for("a b");

    let first = parser.fail(ErrorImpl::MissingRightHand);
    parser.advance();
    let second = parser.fail(ErrorImpl::HashKeyExpected);

    assert_eq!(first.get_impl(), &ErrorImpl::MissingRightHand);
    assert_eq!(second.get_impl(), &ErrorImpl::MissingRightHand);
    assert_eq!(second.get_position().offset, 0);
    assert_eq!(
        parser.error().map(|error| error.get_impl().clone()),
        Some(ErrorImpl::MissingRightHand)
    );
}

#[test]
fn test_unexpected_is_not_recorded() {
    let mut parser = parser_for(")");

    let error = parser.unexpected();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            token: String::from(")")
        }
    );
    assert!(parser.error().is_none());
}

#[test]
fn test_context_survives_failure() {
    let (parser, result) = parse(tokens("h = {a 1}"));
    let error = result.unwrap_err();

    assert_eq!(error.get_impl(), &ErrorImpl::HashColonMissing);
    assert_eq!(error.get_context(), Some("hash"));
    assert_eq!(parser.context(), Some("hash"));
    assert!(parser.error().is_some());
}

#[test]
fn test_argument_depth_is_balanced() {
    let (parser, result) = parse(tokens("f(g(1), [h(2)])"));
    assert!(result.is_ok());
    assert_eq!(parser.argument_depth(), 0);
}

// Expressions

#[test]
fn test_binary_operators_are_left_associative() {
    assert_eq!(dump("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(dump("a / b * c % d"), "(% (* (/ a b) c) d)");
}

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    assert_eq!(dump("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(dump("(1 + 2) * 3"), "(* (+ 1 2) 3)");
}

#[test]
fn test_full_precedence_ladder() {
    assert_eq!(
        dump("a << 1 < b == c & d ^ e | f && g || h"),
        "(|| (&& (| (^ (& (== (< (<< a 1) b) c) d) e) f) g) h)"
    );
    assert_eq!(dump("a >= b != c <= d"), "(!= (>= a b) (<= c d))");
}

#[test]
fn test_prefix_operators_chain() {
    assert_eq!(dump("!!x"), "(! (! x))");
    assert_eq!(dump("~-x"), "(~ (- x))");
    assert_eq!(dump("++x"), "(++ x)");
    assert_eq!(dump("x = -1"), "(= x (- 1))");
}

#[test]
fn test_postfix_applies_once() {
    assert_eq!(dump("x++"), "(x ++)");
    assert_eq!(dump("-x++"), "(- (x ++))");
    assert_eq!(error_of("x++--").get_impl(), &ErrorImpl::MissingNewline);
}

#[test]
fn test_power_does_not_chain() {
    assert_eq!(dump("2 ** 3"), "(** 2 3)");
    assert_eq!(dump("-2 ** 2"), "(- (** 2 2))");
    assert_eq!(dump("a * b ** c"), "(* a (** b c))");

    let error = error_of("2**3**4");
    assert_eq!(error.get_impl(), &ErrorImpl::MissingNewline);
    assert_eq!(error.get_position().offset, 4);
}

#[test]
fn test_literals() {
    assert_eq!(dump("x = 2.5"), "(= x 2.5)");
    assert_eq!(dump("s = \"hi\\n\""), "(= s \"hi\\n\")");
    assert_eq!(dump("n = 42"), "(= n 42)");
}

#[test]
fn test_array_literal() {
    assert_eq!(dump("[1, 2, 3,]"), "[1 2 3]");
    assert_eq!(dump("[]"), "[]");
    assert_eq!(dump("a = [[1], [2, x + 1]]"), "(= a [[1] [2 (+ x 1)]])");
}

#[test]
fn test_hash_literal() {
    assert_eq!(dump("{}"), "{}");
    assert_eq!(dump("h = {a: 1, b: [2]}"), "(= h {a: 1, b: [2]})");
    assert_eq!(dump("{a: 1, b: 2, a: 3}"), "{a: 3, b: 2}");
}

#[test]
fn test_call_arguments() {
    assert_eq!(dump("f()"), "(call f)");
    assert_eq!(dump("f(1, 2, x: 3)"), "(call f 1 2 x: 3)");
    assert_eq!(dump("f(x: 1, x: 2)"), "(call f x: 2)");
    assert_eq!(dump("f(1,\n  2)"), "(call f 1 2)");

    let block = parse_source("f(1, x: 3)", "test.kes").unwrap();
    let Node::Call(call) = &block.body[0] else {
        panic!("expected a call, got {}", block.body[0]);
    };
    assert_eq!(call.arguments.len(), 1);
    assert_eq!(
        call.named_arguments.get("x").map(|node| node.to_string()),
        Some(String::from("3"))
    );
}

#[test]
fn test_dot_calls_append_receiver() {
    assert_eq!(dump("a.b(c)"), "(call b c a)");
    assert_eq!(dump("a.b()"), "(call b a)");
    assert_eq!(dump("f(1).g(2)"), "(call g 2 (call f 1))");
}

#[test]
fn test_dot_without_call_is_slot_access() {
    assert_eq!(dump("a.b"), "(. a b)");
    assert_eq!(dump("a.b.c"), "(. a (. b c))");
}

#[test]
fn test_fork_wraps_whole_expression() {
    assert_eq!(dump("x &"), "(call fork x)");
    assert_eq!(dump("a || b &"), "(call fork (|| a b))");
    assert_eq!(dump("run(1) &\ny = 2"), "(call fork (call run 1))\n(= y 2)");
}

#[test]
fn test_assignments() {
    assert_eq!(dump("let x = 1"), "(let = x 1)");
    assert_eq!(dump("let x += 1"), "(+= x 1)");
    assert_eq!(dump("a = b = c"), "(= a (= b c))");
    assert_eq!(dump("x ||= y"), "(||= x y)");
    assert_eq!(dump("x &&= y"), "(&&= x y)");
}

#[test]
fn test_not_keyword() {
    assert_eq!(dump("not not x"), "(not (not x))");
    assert_eq!(dump("not x = 1"), "(not (= x 1))");
    assert_eq!(dump("a = not b"), "(= a (not b))");
}

#[test]
fn test_spans_cover_the_expression() {
    let block = parse_source("x = 1\nfoo(1,\n  2)", "test.kes").unwrap();
    let call = &block.body[1];

    assert_eq!(call.get_span().start.line, 2);
    assert_eq!(call.get_span().end.line, 3);
    assert_eq!(call.get_span().start.offset, 6);
}

// Statements

#[test]
fn test_statements_on_separate_lines() {
    assert_eq!(dump("x = 1\ny = 2\n\nz = x + y"), "(= x 1)\n(= y 2)\n(= z (+ x y))");
    assert_eq!(error_of("x = 1 y = 2").get_impl(), &ErrorImpl::MissingNewline);
}

#[test]
fn test_if_statement_forms() {
    assert_eq!(dump("if a\n  b\nend"), "(if a (block b))");
    assert_eq!(
        dump("unless a b else c end"),
        "(unless a (block b) (else (block c)))"
    );
    assert_eq!(
        dump("if a b else c end\nd"),
        "(if a (block b) (else (block c)))\nd"
    );

    // `end` closes the whole conditional, so no `else` may follow it
    let error = error_of("if a b end else c end");
    assert!(matches!(error.get_impl(), ErrorImpl::UnexpectedToken { .. }));
    assert_eq!(error.get_position().offset, 11);
}

#[test]
fn test_else_binds_to_the_open_conditional() {
    assert_eq!(
        dump("if a\n  if b\n    x\n  end\nelse\n  y\nend"),
        "(if a (block (if b (block x))) (else (block y)))"
    );
    assert_eq!(
        dump("if a\n  if b\n    x\n  else\n    y\n  end\nend"),
        "(if a (block (if b (block x) (else (block y)))))"
    );
    assert_eq!(
        dump("while a\n  unless b\n    x\n  end\nend\ny"),
        "(while a (block (unless b (block x))))\ny"
    );
}

#[test]
fn test_else_if_chain() {
    assert_eq!(
        dump("if a\n  b\nelse if c\n  d\nelse\n  e\nend"),
        "(if a (block b) (else-if c (block d)) (else (block e)))"
    );
    assert_eq!(
        dump("if a b else if c d end"),
        "(if a (block b) (else-if c (block d)))"
    );
}

#[test]
fn test_while_and_until() {
    assert_eq!(
        dump("while x < 10\n  x += 1\nend"),
        "(while (< x 10) (block (+= x 1)))"
    );
    assert_eq!(dump("until done end"), "(until done (block))");
}

#[test]
fn test_function_declaration() {
    assert_eq!(
        dump("def add(a: int, b: int = 1): int\n  return a + b\nend"),
        "(def add (a: int) (b: int = 1) -> int (block (return (+ a b))))"
    );
    assert_eq!(dump("def noop end"), "(def noop (block))");
    assert_eq!(dump("def f()\n  1\nend"), "(def f (block 1))");
}

#[test]
fn test_type_declaration_keeps_fields() {
    assert_eq!(
        dump("type Point\n  x: int\n  y: int\nend"),
        "(type Point (x: int) (y: int))"
    );
}

#[test]
fn test_nested_blocks() {
    assert_eq!(
        dump("def f(n: int)\n  while n > 0\n    if n % 2 == 0 print(n) end\n    n -= 1\n  end\nend"),
        "(def f (n: int) (block (while (> n 0) (block (if (== (% n 2) 0) (block (call print n))) (-= n 1)))))"
    );
}

// Diagnostics

#[test]
fn test_missing_right_hand_wins_over_enclosing_errors() {
    let error = error_of("x = 1\ny = [1, 2 +\n");
    assert_eq!(error.get_impl(), &ErrorImpl::MissingRightHand);
    assert_eq!(error.get_context(), Some("additive operation"));
    assert_eq!(error.get_position().line, 3);
}

#[test]
fn test_unclosed_constructs() {
    assert_eq!(
        error_of("[1, 2").get_impl(),
        &ErrorImpl::MissingClosing {
            construct: "array",
            delimiter: "]"
        }
    );
    assert_eq!(
        error_of("{a: 1").get_impl(),
        &ErrorImpl::MissingClosing {
            construct: "hash",
            delimiter: "}"
        }
    );
    assert_eq!(
        error_of("f(1").get_impl(),
        &ErrorImpl::MissingClosing {
            construct: "function call",
            delimiter: ")"
        }
    );
    assert_eq!(
        error_of("(1 + 2").get_impl(),
        &ErrorImpl::MissingClosing {
            construct: "expression",
            delimiter: ")"
        }
    );
    assert_eq!(
        error_of("if a b").get_impl(),
        &ErrorImpl::MissingClosing {
            construct: "block",
            delimiter: "end"
        }
    );
}

#[test]
fn test_hash_pair_errors() {
    assert_eq!(error_of("{a 1}").get_impl(), &ErrorImpl::HashColonMissing);
    assert_eq!(error_of("{1: 2}").get_impl(), &ErrorImpl::HashKeyExpected);
    assert_eq!(
        error_of("{a: }").get_impl(),
        &ErrorImpl::Missing { what: "hash value" }
    );
}

#[test]
fn test_named_argument_key_must_be_identifier() {
    assert_eq!(error_of("f(1: 2)").get_impl(), &ErrorImpl::NamedArgumentKey);
    assert_eq!(
        error_of("f(x: )").get_impl(),
        &ErrorImpl::Missing {
            what: "named argument value"
        }
    );
}

#[test]
fn test_missing_operands() {
    assert_eq!(
        error_of("-").get_impl(),
        &ErrorImpl::MissingOperand { operator: "-" }
    );
    assert_eq!(
        error_of("not").get_impl(),
        &ErrorImpl::MissingOperand { operator: "not" }
    );
    assert_eq!(
        error_of("a.").get_impl(),
        &ErrorImpl::Missing {
            what: "member after '.'"
        }
    );

    let error = error_of("x = ");
    assert_eq!(error.get_impl(), &ErrorImpl::MissingRightHand);
    assert_eq!(error.get_context(), Some("assignment"));
}

#[test]
fn test_statement_errors() {
    let error = error_of(")");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            token: String::from(")")
        }
    );
    assert_eq!(error.get_context(), Some("statement"));

    let error = error_of("if\nend");
    assert_eq!(error.get_impl(), &ErrorImpl::Missing { what: "condition" });
    assert_eq!(error.get_context(), Some("if statement condition"));

    let error = error_of("def f\n  return\nend");
    assert_eq!(error.get_impl(), &ErrorImpl::Missing { what: "return value" });
    assert_eq!(error.get_context(), Some("return statement"));
}

#[test]
fn test_declaration_errors() {
    assert_eq!(
        error_of("def (a: int) end").get_impl(),
        &ErrorImpl::Missing {
            what: "function name"
        }
    );
    assert_eq!(
        error_of("def f(a int) end").get_impl(),
        &ErrorImpl::Missing {
            what: "parameter type"
        }
    );

    let error = error_of("def f(a: int end");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::MissingClosing {
            construct: "parameter list",
            delimiter: ")"
        }
    );
    assert_eq!(error.get_context(), Some("function"));

    assert_eq!(
        error_of("type P end").get_impl(),
        &ErrorImpl::Missing { what: "field name" }
    );
    assert_eq!(
        error_of("type P x int end").get_impl(),
        &ErrorImpl::Missing {
            what: "':' after field name"
        }
    );
}

#[test]
fn test_nesting_limit() {
    let options = ParserOptions { max_depth: 4 };

    let (_, result) = parse_with_options(tokens("((1))"), options);
    assert_eq!(result.unwrap().len(), 1);

    let (_, result) = parse_with_options(tokens("((((((1))))))"), options);
    assert_eq!(
        result.unwrap_err().get_impl(),
        &ErrorImpl::TooDeeplyNested { limit: 4 }
    );

    let (_, result) = parse_with_options(tokens("!!!!!!x"), options);
    assert_eq!(
        result.unwrap_err().get_impl(),
        &ErrorImpl::TooDeeplyNested { limit: 4 }
    );
}

#[test]
fn test_default_nesting_limit_fits_a_small_stack() {
    let limit = ParserOptions::default().max_depth;

    let outcome = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            // Positions hold `Rc`s, so only the error kinds leave the thread
            let run = |source: &str| {
                parse_source(source, "test.kes")
                    .map(|block| block.len())
                    .map_err(|error| error.get_impl().clone())
            };

            let deepest = format!("{}1{}", "(".repeat(limit - 1), ")".repeat(limit - 1));
            let accepted = run(&deepest);
            let unclosed = run(&"(".repeat(limit - 1));

            let too_deep = format!("{}1{}", "(".repeat(limit), ")".repeat(limit));
            let rejected = run(&too_deep);

            (accepted, unclosed, rejected)
        })
        .unwrap()
        .join()
        .unwrap();

    let (accepted, unclosed, rejected) = outcome;
    assert_eq!(accepted, Ok(1));
    assert!(unclosed.is_err());
    assert_eq!(rejected, Err(ErrorImpl::TooDeeplyNested { limit }));
}

#[test]
fn test_number_errors_come_from_the_lexer() {
    assert_eq!(
        error_of("x = 99999999999999999999").get_impl(),
        &ErrorImpl::NumberParseError {
            token: String::from("99999999999999999999")
        }
    );
}
