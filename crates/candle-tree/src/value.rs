//! Property values.

use candle_parse::{Result as EventResult, ValueKind, Visitor};

/// The value carried by a property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    Float(f32),
    String(String),
    /// A bare enum token, stored verbatim.
    Enum(String),
    Null,
    /// "Use the built-in default."
    Default,
    Array(Array),
}

impl Value {
    /// Build an enum value from anything that prints as its token.
    pub fn enumeration(value: impl ToString) -> Self {
        Value::Enum(value.to_string())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Enum(_) => ValueKind::Enum,
            Value::Null => ValueKind::Null,
            Value::Default => ValueKind::Default,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Value::Default)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The text of a string or enum value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) | Value::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Emit this value as flat events.
    pub fn events<V: Visitor + ?Sized>(&self, visitor: &mut V) -> EventResult<()> {
        match self {
            Value::Boolean(v) => visitor.boolean(*v),
            Value::Integer(v) => visitor.integer(*v),
            Value::Float(v) => visitor.float(*v),
            Value::String(v) => visitor.string(v),
            Value::Enum(v) => visitor.enumeration(v),
            Value::Null => visitor.null(),
            Value::Default => visitor.default_value(),
            Value::Array(array) => array.events(visitor),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

/// A homogeneous array value.
///
/// Only string and enum arrays can hold missing (`null`) items. An array
/// without any non-null item is always [`Array::Null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Array {
    #[default]
    Null,
    Boolean(Vec<bool>),
    Integer(Vec<i32>),
    Float(Vec<f32>),
    String(Vec<Option<String>>),
    Enum(Vec<Option<String>>),
}

impl Array {
    /// Build a string array without missing items.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Array::String(items.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Build an enum array from anything that prints as its tokens.
    pub fn enums<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: ToString,
    {
        Array::Enum(items.into_iter().map(|e| Some(e.to_string())).collect())
    }

    /// Kind shared by all non-null items.
    pub fn item_type(&self) -> ValueKind {
        match self {
            Array::Null => ValueKind::Null,
            Array::Boolean(_) => ValueKind::Boolean,
            Array::Integer(_) => ValueKind::Integer,
            Array::Float(_) => ValueKind::Float,
            Array::String(_) => ValueKind::String,
            Array::Enum(_) => ValueKind::Enum,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Array::Null => 0,
            Array::Boolean(v) => v.len(),
            Array::Integer(v) => v.len(),
            Array::Float(v) => v.len(),
            Array::String(v) | Array::Enum(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emit this array as flat events, missing items as `null`.
    pub fn events<V: Visitor + ?Sized>(&self, visitor: &mut V) -> EventResult<()> {
        visitor.array()?;
        match self {
            Array::Null => {}
            Array::Boolean(items) => {
                for item in items {
                    visitor.boolean(*item)?;
                }
            }
            Array::Integer(items) => {
                for item in items {
                    visitor.integer(*item)?;
                }
            }
            Array::Float(items) => {
                for item in items {
                    visitor.float(*item)?;
                }
            }
            Array::String(items) => {
                for item in items {
                    match item {
                        Some(s) => visitor.string(s)?,
                        None => visitor.null()?,
                    }
                }
            }
            Array::Enum(items) => {
                for item in items {
                    match item {
                        Some(s) => visitor.enumeration(s)?,
                        None => visitor.null()?,
                    }
                }
            }
        }
        visitor.array_end()
    }
}
