use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(thiserror::Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    context: Option<&'static str>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            context: None,
        }
    }

    /// Attaches the "what were we parsing" label reported alongside the message.
    pub fn with_context(mut self, context: Option<&'static str>) -> Self {
        self.context = context;
        self
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_context(&self) -> Option<&'static str> {
        self.context
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::MissingClosing { .. } => "MissingClosing",
            ErrorImpl::MissingRightHand => "MissingRightHand",
            ErrorImpl::MissingOperand { .. } => "MissingOperand",
            ErrorImpl::Missing { .. } => "Missing",
            ErrorImpl::HashKeyExpected => "HashKeyExpected",
            ErrorImpl::HashColonMissing => "HashColonMissing",
            ErrorImpl::NamedArgumentKey => "NamedArgumentKey",
            ErrorImpl::MissingNewline => "MissingNewline",
            ErrorImpl::TooDeeplyNested { .. } => "TooDeeplyNested",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::MissingClosing { delimiter, .. } => {
                ErrorTip::Suggestion(format!("Did you forget a closing `{}`?", delimiter))
            }
            ErrorImpl::MissingRightHand => ErrorTip::Suggestion(String::from(
                "An operator needs an expression on its right-hand side",
            )),
            ErrorImpl::MissingOperand { operator } => {
                ErrorTip::Suggestion(format!("`{}` needs an operand", operator))
            }
            ErrorImpl::Missing { .. } => ErrorTip::None,
            ErrorImpl::HashKeyExpected => ErrorTip::Suggestion(String::from(
                "Hash keys are bare identifiers, as in `{ name: value }`",
            )),
            ErrorImpl::HashColonMissing => {
                ErrorTip::Suggestion(String::from("Separate a hash key from its value with `:`"))
            }
            ErrorImpl::NamedArgumentKey => ErrorTip::Suggestion(String::from(
                "Named arguments are written `name: value`",
            )),
            ErrorImpl::MissingNewline => ErrorTip::Suggestion(String::from(
                "Start each statement on its own line",
            )),
            ErrorImpl::TooDeeplyNested { limit } => ErrorTip::Suggestion(format!(
                "Nesting is limited to {} levels, split the expression up",
                limit
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("{construct} missing closing '{delimiter}'")]
    MissingClosing {
        construct: &'static str,
        delimiter: &'static str,
    },
    #[error("missing right-hand expression")]
    MissingRightHand,
    #[error("missing operand after '{operator}'")]
    MissingOperand { operator: &'static str },
    #[error("missing {what}")]
    Missing { what: &'static str },
    #[error("hash pair key expected")]
    HashKeyExpected,
    #[error("hash pair ':' missing")]
    HashColonMissing,
    #[error("named argument key must be an identifier")]
    NamedArgumentKey,
    #[error("missing newline")]
    MissingNewline,
    #[error("expression nested too deeply (limit {limit})")]
    TooDeeplyNested { limit: usize },
}
