//! Closed enumerations describing nodes and values.

use std::fmt;

/// The structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Comment,
    Object,
    Document,
    Property,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Comment => "Comment",
            NodeKind::Object => "Object",
            NodeKind::Document => "Document",
            NodeKind::Property => "Property",
        };
        f.write_str(name)
    }
}

/// The kind of value carried by a property, or the item type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Array,
    Boolean,
    Enum,
    Float,
    Integer,
    Null,
    Default,
    String,
}

impl ValueKind {
    /// Whether `null` is an acceptable item of an array of this type.
    ///
    /// Only string and enum arrays have a "missing" slot; `Null` arrays
    /// contain nothing but nulls by construction.
    pub fn accepts_null_items(self) -> bool {
        matches!(self, ValueKind::Enum | ValueKind::String | ValueKind::Null)
    }

    /// Whether this is one of the two valueless sentinels.
    pub fn is_sentinel(self) -> bool {
        matches!(self, ValueKind::Null | ValueKind::Default)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Array => "Array",
            ValueKind::Boolean => "Boolean",
            ValueKind::Enum => "Enum",
            ValueKind::Float => "Float",
            ValueKind::Integer => "Integer",
            ValueKind::Null => "Null",
            ValueKind::Default => "Default",
            ValueKind::String => "String",
        };
        f.write_str(name)
    }
}
