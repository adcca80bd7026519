//! Errors raised by tree navigation, mutation and parsing.

use candle_parse::{GrammarViolation, LexerError, NodeKind, ParserError, ValueKind};
use thiserror::Error;

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any failure produced while building, navigating or mutating a tree.
#[derive(Debug, Error)]
pub enum Error {
    /// The event stream broke the grammar.
    #[error(transparent)]
    Grammar(#[from] GrammarViolation),

    /// The source text contains an invalid token.
    #[error(transparent)]
    Lexer(#[from] LexerError),

    /// The source text is not a well-formed document.
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// A node or value has a different type than the caller asked for.
    #[error("Expected {expected} but got {found}")]
    TypeMismatch { expected: String, found: String },

    /// A path or node could not be found.
    #[error("Could not locate element with name \"{path}\"{}", closest(.path, .segment))]
    NotFound { path: String, segment: String },

    /// An unsigned accessor found a negative number.
    #[error("Expected an unsigned value but got {value}")]
    NegativeValue { value: String },

    /// The document root cannot be renamed.
    #[error("Cannot alter node name of root document node")]
    ImmutableRoot,

    /// Node names must be non-empty.
    #[error("Invalid node name \"{0}\"")]
    InvalidName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn node_kind(expected: NodeKind, found: NodeKind) -> Self {
        Error::TypeMismatch {
            expected: format!("node of type {expected}"),
            found: found.to_string(),
        }
    }

    pub(crate) fn value_kind(expected: impl std::fmt::Display, found: ValueKind) -> Self {
        Error::TypeMismatch {
            expected: format!("value of type {expected}"),
            found: found.to_string(),
        }
    }

    pub(crate) fn not_container(segment: &str, found: NodeKind) -> Self {
        Error::TypeMismatch {
            expected: format!("container node at \"{segment}\""),
            found: found.to_string(),
        }
    }

    pub(crate) fn not_found(path: &str, segment: &str) -> Self {
        Error::NotFound {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub(crate) fn negative(value: impl std::fmt::Display) -> Self {
        Error::NegativeValue {
            value: value.to_string(),
        }
    }

    /// Whether this is a lookup failure rather than a type or syntax problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether this is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}

fn closest(path: &str, segment: &str) -> String {
    if path == segment {
        String::new()
    } else {
        format!(" (failed to locate closest node \"{segment}\")")
    }
}

impl From<candle_parse::Error> for Error {
    fn from(error: candle_parse::Error) -> Self {
        match error {
            candle_parse::Error::Grammar(e) => Error::Grammar(e),
            candle_parse::Error::Lexer(e) => Error::Lexer(e),
            candle_parse::Error::Parser(e) => Error::Parser(e),
        }
    }
}
