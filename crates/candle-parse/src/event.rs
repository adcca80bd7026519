//! The flat event vocabulary shared by the parser, validator and tree builder.

use std::borrow::Cow;

use crate::ValueKind;

/// One unit of a Candle event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    // Structure
    /// Start of a named object. Closed by [`Event::ObjectEnd`].
    Object { name: Cow<'a, str> },
    /// End of the innermost open object.
    ObjectEnd,
    /// Name of a property. The next value event (or array) is its value.
    Property { name: Cow<'a, str> },
    /// Start of an array value.
    ArrayStart,
    /// End of the open array.
    ArrayEnd,
    /// A comment. `text` excludes the `//` or `/* */` delimiters.
    Comment { text: Cow<'a, str> },

    // Values
    Boolean(bool),
    Integer(i32),
    Float(f32),
    String(Cow<'a, str>),
    /// A bare enum token, stored verbatim.
    Enum(Cow<'a, str>),
    Null,
    /// The "use the built-in default" sentinel.
    Default,
}

impl<'a> Event<'a> {
    /// The value kind of a value event, `None` for structural events.
    pub fn value_kind(&self) -> Option<ValueKind> {
        match self {
            Event::Boolean(_) => Some(ValueKind::Boolean),
            Event::Integer(_) => Some(ValueKind::Integer),
            Event::Float(_) => Some(ValueKind::Float),
            Event::String(_) => Some(ValueKind::String),
            Event::Enum(_) => Some(ValueKind::Enum),
            Event::Null => Some(ValueKind::Null),
            Event::Default => Some(ValueKind::Default),
            Event::Object { .. }
            | Event::ObjectEnd
            | Event::Property { .. }
            | Event::ArrayStart
            | Event::ArrayEnd
            | Event::Comment { .. } => None,
        }
    }

    /// Short description used in grammar violation messages.
    pub fn category(&self) -> &'static str {
        match self {
            Event::Object { .. } => "object",
            Event::ObjectEnd => "object end",
            Event::Property { .. } => "property",
            Event::ArrayStart => "array",
            Event::ArrayEnd => "array end",
            Event::Comment { .. } => "comment",
            _ => "value",
        }
    }

    /// Detach this event from the buffer it borrows from.
    pub fn into_owned(self) -> Event<'static> {
        match self {
            Event::Object { name } => Event::Object {
                name: Cow::Owned(name.into_owned()),
            },
            Event::ObjectEnd => Event::ObjectEnd,
            Event::Property { name } => Event::Property {
                name: Cow::Owned(name.into_owned()),
            },
            Event::ArrayStart => Event::ArrayStart,
            Event::ArrayEnd => Event::ArrayEnd,
            Event::Comment { text } => Event::Comment {
                text: Cow::Owned(text.into_owned()),
            },
            Event::Boolean(v) => Event::Boolean(v),
            Event::Integer(v) => Event::Integer(v),
            Event::Float(v) => Event::Float(v),
            Event::String(v) => Event::String(Cow::Owned(v.into_owned())),
            Event::Enum(v) => Event::Enum(Cow::Owned(v.into_owned())),
            Event::Null => Event::Null,
            Event::Default => Event::Default,
        }
    }
}
