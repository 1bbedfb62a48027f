use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("type", TokenKind::Type);
        map.insert("def", TokenKind::Def);
        map.insert("if", TokenKind::If);
        map.insert("unless", TokenKind::Unless);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("until", TokenKind::Until);
        map.insert("return", TokenKind::Return);
        map.insert("end", TokenKind::End);
        map.insert("not", TokenKind::Not);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Int,
    Float,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Comma,
    Colon,
    Dot,

    Assignment, // =
    Equals,     // ==
    Bang,       // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    ShiftLeft,
    ShiftRight,

    Or,  // ||
    And, // &&
    Pipe,
    Ampersand,
    Caret,
    Tilde,
    Fork, // trailing &

    PlusPlus,
    MinusMinus,
    PlusEquals,
    MinusEquals,
    SlashEquals,
    StarEquals,
    OrEquals,
    AndEquals,

    Plus,
    Dash,
    Slash,
    Star,
    StarStar,
    Percent,

    // Reserved
    Let,
    Type,
    Def,
    If,
    Unless,
    Else,
    While,
    Until,
    Return,
    End,
    Not,
}

impl TokenKind {
    /// Source spelling of an operator or keyword, used in AST dumps and diagnostics.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::EOF => "end of input",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Assignment => "=",
            TokenKind::Equals => "==",
            TokenKind::Bang => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEquals => ">=",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::Or => "||",
            TokenKind::And => "&&",
            TokenKind::Pipe => "|",
            TokenKind::Ampersand => "&",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Fork => "&",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::SlashEquals => "/=",
            TokenKind::StarEquals => "*=",
            TokenKind::OrEquals => "||=",
            TokenKind::AndEquals => "&&=",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Percent => "%",
            TokenKind::Let => "let",
            TokenKind::Type => "type",
            TokenKind::Def => "def",
            TokenKind::If => "if",
            TokenKind::Unless => "unless",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Until => "until",
            TokenKind::Return => "return",
            TokenKind::End => "end",
            TokenKind::Not => "not",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Typed payload of a literal or identifier token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Int(i64),
    Float(f64),
    Text(Rc<str>),
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// The lexeme as written in the source
    pub value: String,
    pub payload: TokenValue,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.payload {
            TokenValue::Int(value) => Some(value),
            _ => self.value.parse().ok(),
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.payload {
            TokenValue::Float(value) => Some(value),
            _ => self.value.parse().ok(),
        }
    }

    /// Identifier or string text, falling back to the lexeme for tokens
    /// built without a payload.
    pub fn as_text(&self) -> Rc<str> {
        match &self.payload {
            TokenValue::Text(text) => Rc::clone(text),
            _ => Rc::from(self.value.as_str()),
        }
    }
}
