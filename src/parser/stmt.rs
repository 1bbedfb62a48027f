use log::{debug, trace};

use crate::{
    ast::{
        ast::Node,
        statements::{
            BlockStmt, FnDeclStmt, IfStmt, ParamDecl, ReturnStmt, TypeDeclStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr,
    parser::{Parser, TokenStream},
    types::{parse_field_decls, parse_type_name},
};

/// Tokens that may directly follow an expression statement on the same line.
const STATEMENT_CLOSERS: [TokenKind; 6] = [
    TokenKind::CloseParen,
    TokenKind::CloseBracket,
    TokenKind::CloseCurly,
    TokenKind::End,
    TokenKind::Else,
    TokenKind::EOF,
];

pub fn parse_stmt<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("statement");
    parser.set_context("statement");

    let kind = parser.peek_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    parse_expr_stmt(parser)
}

/// An expression that must be followed by a closer, the end of input or a
/// token on a later line.
pub fn parse_expr_stmt<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("expression statement");
    let expr = parse_expr(parser).map_err(|error| parser.report(error))?;

    let last_line = parser.last_line();
    let next = parser.peek();
    if !next.is_one_of_many(&STATEMENT_CLOSERS) && next.span.start.line <= last_line {
        return Err(parser.fail(ErrorImpl::MissingNewline));
    }

    Ok(expr)
}

/// Statements up to and including `end`.
pub fn parse_block<I: TokenStream>(parser: &mut Parser<I>) -> Result<BlockStmt, Error> {
    parse_block_until(parser, false).map(|(block, _)| block)
}

/// Like `parse_block`, but with `stop_at_else` the block may also end just
/// before an `else`, which is left for the enclosing conditional. Also
/// returns the kind of the token that closed the block.
fn parse_block_until<I: TokenStream>(
    parser: &mut Parser<I>,
    stop_at_else: bool,
) -> Result<(BlockStmt, TokenKind), Error> {
    parser.nested(|parser| {
        trace!("block");
        let opened_by = parser.context();
        let start = parser.peek().span.clone();
        let mut body = vec![];

        let closer = loop {
            if parser.accept(TokenKind::End).is_some() {
                break TokenKind::End;
            }

            if stop_at_else && parser.is(TokenKind::Else) {
                break TokenKind::Else;
            }

            if parser.is(TokenKind::EOF) {
                // Report the construct that opened the block, not its last statement
                if let Some(context) = opened_by {
                    parser.set_context(context);
                }
                return Err(parser.fail(ErrorImpl::MissingClosing {
                    construct: "block",
                    delimiter: "end",
                }));
            }

            body.push(parse_stmt(parser)?);
        };

        let block = BlockStmt {
            body,
            span: start.to(parser.last_span()),
        };
        Ok((block, closer))
    })
}

/// Statements until the end of input; no `end` is needed at the top level.
pub fn parse_program<I: TokenStream>(parser: &mut Parser<I>) -> Result<BlockStmt, Error> {
    trace!("program");
    let start = parser.peek().span.clone();
    let mut body = vec![];

    while parser.accept(TokenKind::EOF).is_none() {
        body.push(parse_stmt(parser)?);
    }

    debug!("parsed program with {} statements", body.len());

    Ok(BlockStmt {
        body,
        span: start.to(parser.last_span()),
    })
}

/// (`if` | `unless`) cond stmts (`else` `if` cond stmts)* (`else` stmts)? `end`
///
/// A single `end` closes the whole chain, so an `else` always belongs to
/// the innermost conditional that has not yet seen its `end`.
pub fn parse_if_stmt<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("if statement");
    let keyword = parser.advance();
    let negate = keyword.kind == TokenKind::Unless;

    parser.set_context("if statement condition");
    let condition = parse_condition(parser)?;

    parser.set_context("if statement");
    let (then_body, mut closer) = parse_block_until(parser, true)?;

    let mut else_ifs = vec![];
    let mut else_body = None;

    while closer == TokenKind::Else {
        parser.advance();

        if parser.accept(TokenKind::If).is_none() {
            parser.set_context("else statement");
            else_body = Some(parse_block(parser)?);
            break;
        }

        let start = parser.last_span().clone();
        parser.set_context("else if statement condition");
        let condition = parse_condition(parser)?;

        parser.set_context("else if statement");
        let (body, next) = parse_block_until(parser, true)?;
        closer = next;

        else_ifs.push(IfStmt {
            negate: false,
            condition: Box::new(condition),
            span: start.to(&body.span),
            then_body: body,
            else_ifs: vec![],
            else_body: None,
        });
    }

    Ok(Node::If(IfStmt {
        negate,
        condition: Box::new(condition),
        then_body,
        else_ifs,
        else_body,
        span: keyword.span.to(parser.last_span()),
    }))
}

fn parse_condition<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    parse_expr(parser).map_err(|_| parser.fail(ErrorImpl::Missing { what: "condition" }))
}

/// (`while` | `until`) cond block
pub fn parse_while_stmt<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("while statement");
    let keyword = parser.advance();
    let negate = keyword.kind == TokenKind::Until;

    parser.set_context("while statement condition");
    let condition = parse_condition(parser)?;

    parser.set_context("while statement");
    let body = parse_block(parser)?;

    Ok(Node::While(WhileStmt {
        negate,
        condition: Box::new(condition),
        span: keyword.span.to(&body.span),
        body,
    }))
}

/// `return` expr; a bare `return` is rejected.
pub fn parse_return_stmt<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("return statement");
    let keyword = parser.advance();
    parser.set_context("return statement");

    let value = parse_expr(parser).map_err(|_| {
        parser.fail(ErrorImpl::Missing {
            what: "return value",
        })
    })?;

    Ok(Node::Return(ReturnStmt {
        span: keyword.span.to(value.get_span()),
        value: Box::new(value),
    }))
}

/// `def` name (`(` params `)`)? (`:` type)? block
pub fn parse_fn_decl_stmt<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("function statement");
    let keyword = parser.advance();
    parser.set_context("function statement");

    let identifier = parser.expect_identifier("function name")?;

    let mut parameters = vec![];
    if parser.accept(TokenKind::OpenParen).is_some() {
        parameters = parse_params(parser)?;

        parser.set_context("function");
        if parser.accept(TokenKind::CloseParen).is_none() {
            return Err(parser.fail(ErrorImpl::MissingClosing {
                construct: "parameter list",
                delimiter: ")",
            }));
        }
    }

    parser.set_context("function");

    let mut return_type = None;
    if parser.accept(TokenKind::Colon).is_some() {
        return_type = Some(parse_type_name(parser, "type after ':'")?);
    }

    let body = parse_block(parser)?;

    Ok(Node::FnDecl(FnDeclStmt {
        identifier,
        return_type,
        span: keyword.span.to(&body.span),
        body,
        parameters,
    }))
}

/// (name `:` type (`=` expr)? (`,` ...)*)? with the `(` already consumed.
fn parse_params<I: TokenStream>(parser: &mut Parser<I>) -> Result<Vec<ParamDecl>, Error> {
    trace!("function params");
    parser.set_context("function params");
    let mut parameters = vec![];

    if !parser.is(TokenKind::Identifier) {
        return Ok(parameters);
    }

    loop {
        let name = parser.expect_identifier("parameter name")?;
        let start = parser.last_span().clone();

        if parser.accept(TokenKind::Colon).is_none() {
            return Err(parser.fail(ErrorImpl::Missing {
                what: "parameter type",
            }));
        }
        let type_name = parse_type_name(parser, "parameter type name")?;

        let mut default = None;
        if parser.accept(TokenKind::Assignment).is_some() {
            let value = parse_expr(parser).map_err(|_| {
                parser.fail(ErrorImpl::Missing {
                    what: "default value",
                })
            })?;
            default = Some(value);
        }

        parameters.push(ParamDecl {
            name,
            type_name,
            default,
            span: start.to(parser.last_span()),
        });

        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }

    Ok(parameters)
}

/// `type` name (field `:` type)+ `end`
pub fn parse_type_decl_stmt<I: TokenStream>(parser: &mut Parser<I>) -> Result<Node, Error> {
    trace!("type statement");
    let keyword = parser.advance();
    parser.set_context("type statement");

    let name = parse_type_name(parser, "type name")?;
    let fields = parse_field_decls(parser)?;

    Ok(Node::TypeDecl(TypeDeclStmt {
        name,
        fields,
        span: keyword.span.to(parser.last_span()),
    }))
}
