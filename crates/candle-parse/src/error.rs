//! Errors raised while scanning, parsing and validating event streams.

use std::borrow::Cow;

use thiserror::Error;

use crate::Span;

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An event arrived that the grammar does not allow at this point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected {expected} but got {found}")]
pub struct GrammarViolation {
    /// What the grammar would have accepted.
    pub expected: Cow<'static, str>,
    /// What actually arrived.
    pub found: Cow<'static, str>,
}

impl GrammarViolation {
    pub fn new(
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// The input contains characters that do not form a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct LexerError {
    /// 1-based line of the offending input.
    pub line: u32,
    /// 1-based column of the offending input.
    pub column: u32,
    pub message: String,
    pub span: Span,
}

impl LexerError {
    /// Build an error for `span`, computing line and column from `source`.
    pub fn at(source: &str, span: Span, message: impl Into<String>) -> Self {
        let (line, column) = span.line_column(source);
        Self {
            line,
            column,
            message: message.into(),
            span,
        }
    }
}

/// The tokens are valid but do not form a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParserError {
    pub message: String,
    pub span: Span,
}

impl ParserError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Any failure produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarViolation),
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parser(#[from] ParserError),
}

impl Error {
    /// The source location of a syntax error, if this is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Grammar(_) => None,
            Error::Lexer(e) => Some(e.span),
            Error::Parser(e) => Some(e.span),
        }
    }
}
