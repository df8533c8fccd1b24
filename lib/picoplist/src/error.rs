use crate::lexer::Token;
use alloc::string::{String, ToString};
use core::{
    fmt::{self, Display},
    num::{ParseFloatError, ParseIntError},
    ops::Range,
};
use serde::de;

#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    FailedToLex,
    InvalidUtf8,
    UnexpectedToken(Token, Expected),
    UnknownElement,
    MismatchedEndTag,
    MissingToken,
    TrailingContent,
    EmptyDocument,
    NestingTooDeep,
    InvalidEntity,
    InvalidInteger(ParseIntError),
    InvalidReal(ParseFloatError),
    Custom(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Expected {
    Element,
    Key,
    Text,
    EndTag,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub range: Range<usize>,
    pub kind: ErrorKind,
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn new(range: Range<usize>, kind: ErrorKind) -> Self {
        Self { range, kind }
    }

    /// An error that happened because we ran out of input.
    pub fn end(input: &str, kind: ErrorKind) -> Error {
        Error { range: input.len()..input.len(), kind }
    }
}

impl de::StdError for Error {}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error { range: 0..0, kind: ErrorKind::Custom(msg.to_string()) }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {}..{})", self.kind, self.range.start, self.range.end)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::FailedToLex => "Failed to lex",
            ErrorKind::InvalidUtf8 => "Document is not valid UTF-8",
            ErrorKind::UnexpectedToken(token, expected) => {
                return write!(f, "UnexpectedToken: {:?} - expected: {:?}", token, expected);
            }
            ErrorKind::UnknownElement => "Unknown element",
            ErrorKind::MismatchedEndTag => "End tag does not match start tag",
            ErrorKind::MissingToken => "Missing token",
            ErrorKind::TrailingContent => "Trailing content after root element",
            ErrorKind::EmptyDocument => "Document has no root value",
            ErrorKind::NestingTooDeep => "Nesting too deep",
            ErrorKind::InvalidEntity => "Invalid character entity",
            ErrorKind::InvalidInteger(err) => return write!(f, "Failed to parse integer: {:?}", err),
            ErrorKind::InvalidReal(err) => return write!(f, "Failed to parse real: {:?}", err),
            ErrorKind::Custom(message) => message,
        };
        f.write_str(s)
    }
}
