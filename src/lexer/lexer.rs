use std::rc::Rc;

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::{
    interner::Interner,
    tokens::{Token, TokenKind, TokenValue, RESERVED_LOOKUP},
};

/// Builds the token for matched text, or `None` for text that is skipped.
pub type RegexHandler = fn(&mut Lexer, &str) -> Result<Option<Token>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Anchored at the cursor and tried in order, so longer operators come first.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^#[^\\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^[0-9]+\\.[0-9]+").unwrap(), handler: float_handler },
        RegexPattern { regex: Regex::new("^[0-9]+").unwrap(), handler: int_handler },
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^\"(?:[^\"\\\\]|\\\\.)*\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket) },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket) },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly) },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly) },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen) },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen) },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals) },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals) },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Bang) },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment) },
        RegexPattern { regex: Regex::new("^<<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft) },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals) },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less) },
        RegexPattern { regex: Regex::new("^>>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::ShiftRight) },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals) },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater) },
        RegexPattern { regex: Regex::new("^\\|\\|=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OrEquals) },
        RegexPattern { regex: Regex::new("^\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or) },
        RegexPattern { regex: Regex::new("^\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Pipe) },
        RegexPattern { regex: Regex::new("^&&=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::AndEquals) },
        RegexPattern { regex: Regex::new("^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And) },
        RegexPattern { regex: Regex::new("^&").unwrap(), handler: ampersand_handler },
        RegexPattern { regex: Regex::new("^\\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Caret) },
        RegexPattern { regex: Regex::new("^~").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Tilde) },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot) },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon) },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma) },
        RegexPattern { regex: Regex::new("^\\+\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusPlus) },
        RegexPattern { regex: Regex::new("^\\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusEquals) },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus) },
        RegexPattern { regex: Regex::new("^--").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusMinus) },
        RegexPattern { regex: Regex::new("^-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusEquals) },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash) },
        RegexPattern { regex: Regex::new("^\\*\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarStar) },
        RegexPattern { regex: Regex::new("^\\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarEquals) },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star) },
        RegexPattern { regex: Regex::new("^/=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashEquals) },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash) },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent) },
    ];
}

/// Streaming tokenizer.
///
/// Yields one token per call and a single trailing `EOF`. Lexing stops
/// after the first error.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
    interner: Interner,
    finished: bool,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            line: 1,
            file: file_name,
            interner: Interner::new(),
            finished: false,
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn get_position(&self) -> Position {
        Position::new(self.pos as u32, self.line, Rc::clone(&self.file))
    }

    /// Builds a token starting at the cursor and covering `matched`.
    pub fn make_token(&self, kind: TokenKind, matched: &str, payload: TokenValue) -> Token {
        let newlines = matched.matches('\n').count() as u32;
        MK_TOKEN!(
            kind,
            String::from(matched),
            payload,
            Span {
                start: self.get_position(),
                end: Position::new(
                    (self.pos + matched.len()) as u32,
                    self.line + newlines,
                    Rc::clone(&self.file)
                ),
            }
        )
    }

    fn advance_over(&mut self, matched: &str) {
        self.pos += matched.len();
        self.line += matched.matches('\n').count() as u32;
    }

    fn eof_token(&self) -> Token {
        MK_TOKEN!(
            TokenKind::EOF,
            String::from("EOF"),
            TokenValue::None,
            Span {
                start: self.get_position(),
                end: self.get_position(),
            }
        )
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.at_eof() {
                debug!(
                    "lexed {} lines of {} with {} distinct names and strings",
                    self.line,
                    self.file,
                    self.interner.len()
                );
                return Ok(self.eof_token());
            }

            let found = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(self.remainder())
                    .map(|m| (m.as_str().to_string(), pattern.handler))
            });

            let Some((matched, handler)) = found else {
                let token = self.remainder().chars().next().map(String::from).unwrap_or_default();
                return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, self.get_position()));
            };

            let token = handler(self, &matched)?;
            self.advance_over(&matched);

            if let Some(token) = token {
                trace!("lexed {} {:?}", token.kind, token.value);
                return Ok(token);
            }
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        if !matches!(&result, Ok(token) if token.kind != TokenKind::EOF) {
            self.finished = true;
        }

        Some(result)
    }
}

fn skip_handler(_lexer: &mut Lexer, _matched: &str) -> Result<Option<Token>, Error> {
    Ok(None)
}

fn int_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    match matched.parse::<i64>() {
        Ok(value) => Ok(Some(lexer.make_token(TokenKind::Int, matched, TokenValue::Int(value)))),
        Err(_) => Err(Error::new(
            ErrorImpl::NumberParseError {
                token: String::from(matched),
            },
            lexer.get_position(),
        )),
    }
}

fn float_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    match matched.parse::<f64>() {
        Ok(value) => Ok(Some(lexer.make_token(TokenKind::Float, matched, TokenValue::Float(value)))),
        Err(_) => Err(Error::new(
            ErrorImpl::NumberParseError {
                token: String::from(matched),
            },
            lexer.get_position(),
        )),
    }
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    if let Some(kind) = RESERVED_LOOKUP.get(matched) {
        return Ok(Some(lexer.make_token(*kind, matched, TokenValue::None)));
    }

    let text = lexer.interner.intern(matched);
    Ok(Some(lexer.make_token(TokenKind::Identifier, matched, TokenValue::Text(text))))
}

fn string_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                while hex.len() < 2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    // `\x` without digits stays as written
                    Err(_) => result.push_str("\\x"),
                }
            }
            // Unknown escapes keep the backslash
            _ => result.push(ch),
        }
    }

    let text = lexer.interner.intern(&result);
    Ok(Some(lexer.make_token(TokenKind::String, matched, TokenValue::Text(text))))
}

/// `&` is a trailing fork marker when nothing but a closer, a comma or the
/// end of the line follows it; otherwise it is bitwise and.
fn ampersand_handler(lexer: &mut Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let rest = &lexer.remainder()[matched.len()..];
    let next = rest.chars().find(|c| *c != ' ' && *c != '\t');

    let kind = match next {
        None | Some('\n') | Some('\r') | Some('#') | Some(')') | Some(']') | Some('}') | Some(',') => {
            TokenKind::Fork
        }
        Some(_) => TokenKind::Ampersand,
    };

    Ok(Some(lexer.make_token(kind, matched, TokenValue::None)))
}

/// Tokenizes a whole source, ending with an `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    Lexer::new(source, file).collect()
}
