//! Event-based core of the Candle configuration format.
//!
//! Candle documents travel through this crate as a flat sequence of
//! [`Event`]s. A [`Parser`] turns text into events, a [`ValidationVisitor`]
//! checks that a sequence obeys the grammar, and any [`Visitor`] can consume
//! the result.

pub use candle_tokenizer::{Span, Token, TokenKind, Tokenizer};

mod error;
pub use error::{Error, GrammarViolation, LexerError, ParserError, Result};

mod event;
pub use event::Event;

mod kind;
pub use kind::{NodeKind, ValueKind};

mod parser;
pub use parser::Parser;

mod validate;
pub use validate::{Validated, ValidationVisitor};

mod visitor;
pub use visitor::Visitor;

/// Parse `source`, validating every event before handing it to `visitor`.
pub fn parse<V: Visitor>(source: &str, visitor: V) -> Result<V> {
    let mut validated = Validated::new(visitor);
    Parser::new(source).parse(&mut validated)?;
    validated.finish()
}
