//! Parser state and entry points.
//!
//! The `Parser` owns a single token of lookahead over any token source,
//! the most recently accepted token, and the diagnostic state that the
//! grammar functions in `expr` and `stmt` report through. Nothing here is
//! global: every grammar function receives the parser by mutable reference.

use std::{collections::HashMap, rc::Rc};

use log::{debug, trace};

use crate::{
    ast::statements::BlockStmt,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind, TokenValue},
    },
    Span, MK_TOKEN,
};

use super::{
    lookups::{create_token_lookups, StmtHandler, StmtLookup},
    stmt::parse_program,
};

/// Anything that yields tokens can feed the parser.
pub trait TokenStream: Iterator<Item = Token> {}

impl<T: Iterator<Item = Token>> TokenStream for T {}

/// Tunables for a parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserOptions {
    /// How many nested expressions, prefix operators, dot chains and blocks
    /// may be open at once before the parse fails with `TooDeeplyNested`.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { max_depth: 24 }
    }
}

pub struct Parser<I: TokenStream> {
    tokens: I,
    /// At most one token is ever buffered ahead of the cursor
    lookahead: Option<Token>,
    /// The most recently accepted token
    previous: Option<Token>,
    /// Span of the most recently consumed token, accepted or advanced over
    last_span: Span,
    /// Where synthesized end-of-input tokens are placed
    eof_span: Span,
    /// The first hard error of this parse; never overwritten
    error: Option<Error>,
    context: Option<&'static str>,
    in_args: u32,
    depth: usize,
    options: ParserOptions,
    stmt_lookup: StmtLookup<I>,
}

impl<I: TokenStream> Parser<I> {
    pub fn new(tokens: I, options: ParserOptions) -> Self {
        Parser {
            tokens,
            lookahead: None,
            previous: None,
            last_span: Span::null(),
            eof_span: Span::null(),
            error: None,
            context: None,
            in_args: 0,
            depth: 0,
            options,
            stmt_lookup: HashMap::new(),
        }
    }

    /// Pulls the next token from the source. An exhausted source keeps
    /// producing `EOF` tokens placed after the last real token.
    fn pull(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.eof_span = Span {
                    start: token.span.end.clone(),
                    end: token.span.end.clone(),
                };
                token
            }
            None => MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                TokenValue::None,
                self.eof_span.clone()
            ),
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.pull(),
        };
        self.lookahead.insert(token)
    }

    pub fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    pub fn is(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consumes and returns the next token.
    pub fn advance(&mut self) -> Token {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.pull(),
        };
        self.last_span = token.span.clone();
        token
    }

    /// Consumes the next token if it is of `kind`, keeping it available
    /// through `prev`.
    pub fn accept(&mut self, kind: TokenKind) -> Option<&Token> {
        if !self.is(kind) {
            return None;
        }

        let token = self.advance();
        trace!("accepted {} {:?}", token.kind, token.value);
        self.previous = Some(token);
        self.previous.as_ref()
    }

    /// Accepts the first of `kinds` that matches the next token.
    pub fn accept_any(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        let kind = self.peek_kind();
        if !kinds.contains(&kind) {
            return None;
        }

        self.accept(kind).map(|token| token.kind)
    }

    pub fn prev(&self) -> Option<&Token> {
        self.previous.as_ref()
    }

    pub fn last_span(&self) -> &Span {
        &self.last_span
    }

    /// Line on which the most recently consumed token ends.
    pub fn last_line(&self) -> u32 {
        self.last_span.end.line
    }

    /// Accepts an identifier and returns its text, failing with
    /// `missing {what}` otherwise.
    pub fn expect_identifier(&mut self, what: &'static str) -> Result<Rc<str>, Error> {
        match self.accept(TokenKind::Identifier) {
            Some(token) => Ok(token.as_text()),
            None => Err(self.fail(ErrorImpl::Missing { what })),
        }
    }

    pub fn set_context(&mut self, context: &'static str) {
        self.context = Some(context);
    }

    pub fn context(&self) -> Option<&'static str> {
        self.context
    }

    /// The recorded error, if the parse has failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Records `error` at the next token unless an error is already
    /// recorded, and returns whichever error is now on record.
    pub fn fail(&mut self, error: ErrorImpl) -> Error {
        let position = self.peek().span.start.clone();
        self.report(Error::new(error, position))
    }

    /// Like `fail`, for an error that was built elsewhere.
    pub fn report(&mut self, error: Error) -> Error {
        match &self.error {
            Some(recorded) => recorded.clone(),
            None => {
                debug!(
                    "{} while parsing {}",
                    error,
                    self.context.unwrap_or("program")
                );
                self.error = Some(error.clone());
                error
            }
        }
    }

    /// An `UnexpectedToken` error at the next token that is not recorded.
    /// Callers that have committed to a construct replace it with their
    /// own message through `fail`.
    pub fn unexpected(&mut self) -> Error {
        let token = self.peek();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    }

    /// Runs `f` one nesting level deeper, failing once the configured
    /// limit is reached.
    pub fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= self.options.max_depth {
            let limit = self.options.max_depth;
            return Err(self.fail(ErrorImpl::TooDeeplyNested { limit }));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Runs `f` while parsing a call's argument list.
    pub fn in_arguments<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.in_args += 1;
        let result = f(self);
        self.in_args -= 1;
        result
    }

    /// How many call argument lists are currently open.
    pub fn argument_depth(&self) -> u32 {
        self.in_args
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup<I> {
        &self.stmt_lookup
    }

    /// Registers the handler for statements starting with `kind`.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler<I>) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses a whole program with the default options.
///
/// Returns the parser alongside the result so callers can inspect the
/// diagnostic state after a failure.
pub fn parse<T>(tokens: T) -> (Parser<T::IntoIter>, Result<BlockStmt, Error>)
where
    T: IntoIterator<Item = Token>,
{
    parse_with_options(tokens, ParserOptions::default())
}

pub fn parse_with_options<T>(
    tokens: T,
    options: ParserOptions,
) -> (Parser<T::IntoIter>, Result<BlockStmt, Error>)
where
    T: IntoIterator<Item = Token>,
{
    let mut parser = Parser::new(tokens.into_iter(), options);
    create_token_lookups(&mut parser);

    let result = parse_program(&mut parser).map_err(|error| {
        let context = parser.context();
        parser.report(error).with_context(context)
    });

    (parser, result)
}

/// Tokenizes and parses `source`, naming it `file` in diagnostics.
pub fn parse_source(source: &str, file: &str) -> Result<BlockStmt, Error> {
    let tokens = tokenize(String::from(source), Some(String::from(file)))?;
    parse(tokens).1
}
