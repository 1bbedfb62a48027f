use std::rc::Rc;

use log::trace;

use crate::{
    ast::{
        ast::{NamedNodes, Node},
        expressions::{
            ArrayExpr, BinaryExpr, CallExpr, FloatExpr, HashExpr, IntExpr, SlotExpr, StringExpr,
            SymbolExpr, UnaryExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{
    lookups::BindingPower,
    parser::{Parser, TokenStream},
};

const PREFIX_OPERATORS: [TokenKind; 6] = [
    TokenKind::PlusPlus,
    TokenKind::MinusMinus,
    TokenKind::Tilde,
    TokenKind::Plus,
    TokenKind::Dash,
    TokenKind::Bang,
];

const POSTFIX_OPERATORS: [TokenKind; 2] = [TokenKind::PlusPlus, TokenKind::MinusMinus];

const ASSIGNMENT_OPERATORS: [TokenKind; 7] = [
    TokenKind::Assignment,
    TokenKind::PlusEquals,
    TokenKind::MinusEquals,
    TokenKind::SlashEquals,
    TokenKind::StarEquals,
    TokenKind::OrEquals,
    TokenKind::AndEquals,
];

/// Entry point for every expression context.
pub fn parse_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("expression");
    parser.nested(parse_not_expr)
}

pub fn parse_not_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("not expression");
    if parser.accept(TokenKind::Not).is_none() {
        return parse_assignment_expr(parser);
    }

    let start = parser.last_span().clone();
    let operand = parser.nested(parse_not_expr).map_err(|_| {
        parser.fail(ErrorImpl::MissingOperand {
            operator: TokenKind::Not.symbol(),
        })
    })?;

    Ok(Node::Unary(UnaryExpr {
        span: start.to(operand.get_span()),
        operator: TokenKind::Not,
        operand: Box::new(operand),
        is_postfix: false,
    }))
}

/// `let`? target (`=` | `+=` | ...) value
///
/// The value is parsed at the `not` level, so `a = b = c` nests to the right.
pub fn parse_assignment_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("assignment expression");
    let let_span = parser.accept(TokenKind::Let).map(|token| token.span.clone());

    let left = match let_span {
        Some(_) => parse_logical_or_expr(parser).map_err(|_| {
            parser.fail(ErrorImpl::Missing {
                what: "variable after 'let'",
            })
        })?,
        None => parse_logical_or_expr(parser)?,
    };

    let Some(operator) = parser.accept_any(&ASSIGNMENT_OPERATORS) else {
        return Ok(left);
    };

    let is_let_decl = let_span.is_some() && operator == TokenKind::Assignment;
    parser.set_context(if operator == TokenKind::Assignment {
        "assignment"
    } else {
        "compound assignment"
    });

    let right = parser
        .nested(parse_not_expr)
        .map_err(|_| parser.fail(ErrorImpl::MissingRightHand))?;

    let start = match &let_span {
        Some(span) if is_let_decl => span.clone(),
        _ => left.get_span().clone(),
    };

    Ok(Node::Binary(BinaryExpr {
        span: start.to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
        is_let_decl,
    }))
}

/// A `||` chain, optionally followed by a trailing `&` which turns the whole
/// expression into `fork(expr)`.
pub fn parse_logical_or_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    let expr = parse_binary_expr(parser, BindingPower::LogicalOr)?;

    let Some(fork) = parser.accept(TokenKind::Fork).map(|token| token.span.clone()) else {
        return Ok(expr);
    };

    trace!("fork");
    let callee = Node::Identifier(SymbolExpr {
        value: Rc::from("fork"),
        span: fork.clone(),
    });

    Ok(Node::Call(CallExpr {
        span: expr.get_span().to(&fork),
        callee: Box::new(callee),
        arguments: vec![expr],
        named_arguments: NamedNodes::new(),
    }))
}

/// Left-associative fold of `level`'s operators.
pub fn parse_binary_expr<I: TokenStream>(
    parser: &mut Parser<I>,
    level: BindingPower,
) -> Result<Node, Error> {
    trace!("{:?} expression", level);
    let mut left = parse_operand(parser, level)?;

    while let Some(operator) = parser.accept_any(level.operators()) {
        parser.set_context(level.context());
        let right = parse_operand(parser, level)
            .map_err(|_| parser.fail(ErrorImpl::MissingRightHand))?;

        left = Node::Binary(BinaryExpr {
            span: left.get_span().to(right.get_span()),
            left: Box::new(left),
            operator,
            right: Box::new(right),
            is_let_decl: false,
        });
    }

    Ok(left)
}

fn parse_operand<I: TokenStream>(
    parser: &mut Parser<I>,
    level: BindingPower,
) -> Result<Node, Error> {
    match level.next() {
        Some(next) => parse_binary_expr(parser, next),
        None => parse_unary_expr(parser),
    }
}

/// Prefix operators chain: `!!x` and `- -x` are both fine.
pub fn parse_unary_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("unary expression");
    let Some(operator) = parser.accept_any(&PREFIX_OPERATORS) else {
        return parse_postfix_expr(parser);
    };

    let start = parser.last_span().clone();
    let operand = parser.nested(parse_unary_expr).map_err(|_| {
        parser.fail(ErrorImpl::MissingOperand {
            operator: operator.symbol(),
        })
    })?;

    Ok(Node::Unary(UnaryExpr {
        span: start.to(operand.get_span()),
        operator,
        operand: Box::new(operand),
        is_postfix: false,
    }))
}

/// At most one `++` or `--` after the operand.
pub fn parse_postfix_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("postfix expression");
    let operand = parse_pow_expr(parser)?;

    let Some(operator) = parser.accept_any(&POSTFIX_OPERATORS) else {
        return Ok(operand);
    };

    Ok(Node::Unary(UnaryExpr {
        span: operand.get_span().to(parser.last_span()),
        operator,
        operand: Box::new(operand),
        is_postfix: true,
    }))
}

/// A single `**`; a second one is left for the caller.
pub fn parse_pow_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("pow expression");
    let left = parse_call_expr(parser)?;

    if parser.accept(TokenKind::StarStar).is_none() {
        return Ok(left);
    }

    parser.set_context("** operation");
    let right = parse_call_expr(parser).map_err(|_| parser.fail(ErrorImpl::MissingRightHand))?;

    Ok(Node::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator: TokenKind::StarStar,
        right: Box::new(right),
        is_let_decl: false,
    }))
}

/// `callee(args)?` optionally followed by `.member`.
///
/// A member that is itself a call receives the receiver as its last
/// positional argument, so `a.b(c)` is `b(c, a)`. Any other member gives a
/// slot access.
pub fn parse_call_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("call expression");
    let mut expr = parse_slot_access_expr(parser)?;

    if parser.accept(TokenKind::OpenParen).is_some() {
        parser.set_context("function call");
        let (arguments, named_arguments) = parser.in_arguments(parse_call_args)?;

        if parser.accept(TokenKind::CloseParen).is_none() {
            return Err(parser.fail(ErrorImpl::MissingClosing {
                construct: "function call",
                delimiter: ")",
            }));
        }

        expr = Node::Call(CallExpr {
            span: expr.get_span().to(parser.last_span()),
            callee: Box::new(expr),
            arguments,
            named_arguments,
        });
    }

    if parser.accept(TokenKind::Dot).is_none() {
        return Ok(expr);
    }

    let member = parser.nested(parse_call_expr).map_err(|_| {
        parser.fail(ErrorImpl::Missing {
            what: "member after '.'",
        })
    })?;

    match member {
        Node::Call(mut call) => {
            call.span = expr.get_span().to(&call.span);
            call.arguments.push(expr);
            Ok(Node::Call(call))
        }
        member => Ok(Node::Slot(SlotExpr {
            span: expr.get_span().to(member.get_span()),
            object: Box::new(expr),
            member: Box::new(member),
        })),
    }
}

/// Comma separated, possibly empty. `name: value` entries become named
/// arguments and are not repeated positionally.
pub fn parse_call_args<I: TokenStream>(
    parser: &mut Parser<I>,
) -> Result<(Vec<Node>, NamedNodes), Error> {
    trace!("call arguments");
    let mut arguments = vec![];
    let mut named = NamedNodes::new();

    if parser.is(TokenKind::CloseParen) {
        return Ok((arguments, named));
    }

    loop {
        let argument =
            parse_expr(parser).map_err(|_| parser.fail(ErrorImpl::Missing { what: "argument" }))?;

        if parser.accept(TokenKind::Colon).is_some() {
            let Some(key) = argument.as_identifier().cloned() else {
                return Err(parser.fail(ErrorImpl::NamedArgumentKey));
            };

            let value = parse_expr(parser).map_err(|_| {
                parser.fail(ErrorImpl::Missing {
                    what: "named argument value",
                })
            })?;
            named.insert(key, value);
        } else {
            arguments.push(argument);
        }

        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }

    Ok((arguments, named))
}

pub fn parse_slot_access_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("slot access expression");
    parse_primary_expr(parser)
}

/// Literals, identifiers, arrays, hashes and parenthesized expressions.
///
/// Anything else is an unrecorded `UnexpectedToken` so that the construct
/// that asked for an operand reports what was missing.
pub fn parse_primary_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("primary expression");
    match parser.peek_kind() {
        TokenKind::Identifier => {
            let token = parser.advance();
            Ok(Node::Identifier(SymbolExpr {
                value: token.as_text(),
                span: token.span,
            }))
        }
        TokenKind::Int => {
            let token = parser.advance();
            match token.as_int() {
                Some(value) => Ok(Node::Int(IntExpr {
                    value,
                    span: token.span,
                })),
                None => Err(number_error(parser, token)),
            }
        }
        TokenKind::Float => {
            let token = parser.advance();
            match token.as_float() {
                Some(value) => Ok(Node::Float(FloatExpr {
                    value,
                    span: token.span,
                })),
                None => Err(number_error(parser, token)),
            }
        }
        TokenKind::String => {
            let token = parser.advance();
            Ok(Node::String(StringExpr {
                value: token.as_text(),
                span: token.span,
            }))
        }
        TokenKind::OpenBracket => {
            let start = parser.advance().span;
            parse_array_expr(parser, start)
        }
        TokenKind::OpenCurly => {
            let start = parser.advance().span;
            parse_hash_expr(parser, start)
        }
        _ => parse_paren_expr(parser),
    }
}

fn number_error<I: TokenStream>(parser: &mut Parser<I>, token: Token) -> Error {
    parser.report(Error::new(
        ErrorImpl::NumberParseError { token: token.value },
        token.span.start,
    ))
}

/// `[` (expr (`,` expr)* `,`?)? `]`, the opening bracket already consumed.
fn parse_array_expr<I: TokenStream>(parser: &mut Parser<I>, start: Span) -> Result<Node, Error> {
    trace!("array expression");
    parser.set_context("array");
    let mut elements = vec![];

    while !parser.is(TokenKind::CloseBracket) {
        let element = parse_expr(parser).map_err(|_| {
            parser.fail(ErrorImpl::Missing {
                what: "array element",
            })
        })?;
        elements.push(element);

        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }

    if parser.accept(TokenKind::CloseBracket).is_none() {
        return Err(parser.fail(ErrorImpl::MissingClosing {
            construct: "array",
            delimiter: "]",
        }));
    }

    Ok(Node::Array(ArrayExpr {
        elements,
        span: start.to(parser.last_span()),
    }))
}

/// `{` (id `:` expr (`,` id `:` expr)* `,`?)? `}`, the opening brace already
/// consumed. A later pair with the same key replaces the earlier value.
fn parse_hash_expr<I: TokenStream>(parser: &mut Parser<I>, start: Span) -> Result<Node, Error> {
    trace!("hash expression");
    parser.set_context("hash");
    let mut pairs = NamedNodes::new();

    while !parser.is(TokenKind::CloseCurly) {
        let Some(key) = parser.accept(TokenKind::Identifier).map(Token::as_text) else {
            return Err(parser.fail(ErrorImpl::HashKeyExpected));
        };

        if parser.accept(TokenKind::Colon).is_none() {
            return Err(parser.fail(ErrorImpl::HashColonMissing));
        }

        let value = parse_expr(parser)
            .map_err(|_| parser.fail(ErrorImpl::Missing { what: "hash value" }))?;
        pairs.insert(key, value);

        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }

    if parser.accept(TokenKind::CloseCurly).is_none() {
        return Err(parser.fail(ErrorImpl::MissingClosing {
            construct: "hash",
            delimiter: "}",
        }));
    }

    Ok(Node::Hash(HashExpr {
        pairs,
        span: start.to(parser.last_span()),
    }))
}

fn parse_paren_expr<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    if parser.accept(TokenKind::OpenParen).is_none() {
        return Err(parser.unexpected());
    }

    trace!("paren expression");
    let expr = parse_expr(parser).map_err(|_| {
        parser.fail(ErrorImpl::Missing {
            what: "expression after '('",
        })
    })?;

    if parser.accept(TokenKind::CloseParen).is_none() {
        return Err(parser.fail(ErrorImpl::MissingClosing {
            construct: "expression",
            delimiter: ")",
        }));
    }

    Ok(expr)
}
