//! Type names in annotations and type declarations.
//!
//! Types are plain identifiers: parameter types, return types and field
//! types all go through `parse_type_name`.

use std::rc::Rc;

use log::trace;

use crate::{
    ast::statements::FieldDecl,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::{Parser, TokenStream};

/// Accepts a type name, failing with `missing {what}`.
pub fn parse_type_name<I: TokenStream>(
    parser: &mut Parser<I>,
    what: &'static str,
) -> Result<Rc<str>, Error> {
    trace!("type name");
    parser.expect_identifier(what)
}

/// `name ':' type`
pub fn parse_field_decl<I: TokenStream>(parser: &mut Parser<I>) -> Result<FieldDecl, Error> {
    let name = parser.expect_identifier("field name")?;
    let start = parser.last_span().clone();

    if parser.accept(TokenKind::Colon).is_none() {
        return Err(parser.fail(ErrorImpl::Missing {
            what: "':' after field name",
        }));
    }

    let type_name = parse_type_name(parser, "field type")?;

    Ok(FieldDecl {
        name,
        type_name,
        span: start.to(parser.last_span()),
    })
}

/// One or more field declarations up to and including `end`.
pub fn parse_field_decls<I: TokenStream>(
    parser: &mut Parser<I>,
) -> Result<Vec<FieldDecl>, Error> {
    let mut fields = vec![];

    loop {
        fields.push(parse_field_decl(parser)?);

        if parser.accept(TokenKind::End).is_some() {
            break;
        }
    }

    Ok(fields)
}
