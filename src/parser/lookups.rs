use std::collections::HashMap;

use crate::{ast::ast::Node, errors::errors::Error, lexer::tokens::TokenKind};

use super::{parser::Parser, parser::TokenStream, stmt::*};

/// The binary operator levels, loosest first.
///
/// Each level folds its operators left-associatively over operands parsed
/// at the next tighter level. Below `Multiplicative` come the unary,
/// postfix, power and call levels, which are not plain folds.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
}

impl BindingPower {
    pub fn operators(&self) -> &'static [TokenKind] {
        match self {
            BindingPower::LogicalOr => &[TokenKind::Or],
            BindingPower::LogicalAnd => &[TokenKind::And],
            BindingPower::BitwiseOr => &[TokenKind::Pipe],
            BindingPower::BitwiseXor => &[TokenKind::Caret],
            BindingPower::BitwiseAnd => &[TokenKind::Ampersand],
            BindingPower::Equality => &[TokenKind::Equals, TokenKind::NotEquals],
            BindingPower::Relational => &[
                TokenKind::Less,
                TokenKind::LessEquals,
                TokenKind::Greater,
                TokenKind::GreaterEquals,
            ],
            BindingPower::Shift => &[TokenKind::ShiftLeft, TokenKind::ShiftRight],
            BindingPower::Additive => &[TokenKind::Plus, TokenKind::Dash],
            BindingPower::Multiplicative => &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
        }
    }

    /// Label reported when the right-hand side of this level is missing.
    pub fn context(&self) -> &'static str {
        match self {
            BindingPower::LogicalOr => "|| operation",
            BindingPower::LogicalAnd => "&& operation",
            BindingPower::BitwiseOr => "| operation",
            BindingPower::BitwiseXor => "^ operation",
            BindingPower::BitwiseAnd => "& operation",
            BindingPower::Equality => "equality operation",
            BindingPower::Relational => "relational operation",
            BindingPower::Shift => "shift operation",
            BindingPower::Additive => "additive operation",
            BindingPower::Multiplicative => "multiplicative operation",
        }
    }

    /// The next tighter level, `None` below `Multiplicative`.
    pub fn next(&self) -> Option<BindingPower> {
        match self {
            BindingPower::LogicalOr => Some(BindingPower::LogicalAnd),
            BindingPower::LogicalAnd => Some(BindingPower::BitwiseOr),
            BindingPower::BitwiseOr => Some(BindingPower::BitwiseXor),
            BindingPower::BitwiseXor => Some(BindingPower::BitwiseAnd),
            BindingPower::BitwiseAnd => Some(BindingPower::Equality),
            BindingPower::Equality => Some(BindingPower::Relational),
            BindingPower::Relational => Some(BindingPower::Shift),
            BindingPower::Shift => Some(BindingPower::Additive),
            BindingPower::Additive => Some(BindingPower::Multiplicative),
            BindingPower::Multiplicative => None,
        }
    }
}

pub type StmtHandler<I> = fn(&mut Parser<I>) -> Result<Node, Error>;

pub type StmtLookup<I> = HashMap<TokenKind, StmtHandler<I>>;

pub fn create_token_lookups<I: TokenStream>(parser: &mut Parser<I>) {
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Unless, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Until, parse_while_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Def, parse_fn_decl_stmt);
    parser.stmt(TokenKind::Type, parse_type_decl_stmt);
}
