//! Tree nodes.

use candle_parse::{NodeKind, Result as EventResult, ValueKind, Visitor};

use crate::{Array, Error, ObjectNode, Result, TreeVisitor, Value};

/// Nodes that carry a name, looked up case-insensitively among siblings.
pub trait NamedNode {
    fn name(&self) -> &str;

    /// Rename this node. Names must be non-empty.
    fn set_name(&mut self, name: impl Into<String>) -> Result<()>;
}

/// Case-insensitive name comparison used for all sibling lookups.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

pub(crate) fn checked_name(name: impl Into<String>) -> Result<String> {
    let name = name.into();
    if name.is_empty() {
        return Err(Error::InvalidName(name));
    }
    Ok(name)
}

/// Any element of a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Comment(CommentNode),
    Object(ObjectNode),
    Property(PropertyNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Comment(_) => NodeKind::Comment,
            Node::Object(object) => object.kind(),
            Node::Property(_) => NodeKind::Property,
        }
    }

    /// Fail with a type mismatch unless this node is of `kind`.
    pub fn ensure_kind(&self, kind: NodeKind) -> Result<()> {
        if self.kind() != kind {
            return Err(Error::node_kind(kind, self.kind()));
        }
        Ok(())
    }

    /// Name of an object or property, `None` for comments.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Comment(_) => None,
            Node::Object(object) => Some(object.name()),
            Node::Property(property) => Some(property.name()),
        }
    }

    pub(crate) fn has_name(&self, name: &str) -> bool {
        self.name().is_some_and(|own| names_match(own, name))
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyNode> {
        match self {
            Node::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut PropertyNode> {
        match self {
            Node::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&CommentNode> {
        match self {
            Node::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    /// Emit this node as flat events.
    pub fn events<V: Visitor + ?Sized>(&self, visitor: &mut V) -> EventResult<()> {
        match self {
            Node::Comment(comment) => visitor.comment(comment.text()),
            Node::Object(object) => {
                visitor.object(object.name())?;
                object.events(visitor)?;
                visitor.object_end()
            }
            Node::Property(property) => property.events(visitor),
        }
    }

    /// Walk this node with a structured visitor.
    pub fn walk<V: TreeVisitor + ?Sized>(&self, visitor: &mut V) {
        crate::visit::walk_node(self, visitor);
    }
}

impl From<CommentNode> for Node {
    fn from(node: CommentNode) -> Self {
        Node::Comment(node)
    }
}

impl From<ObjectNode> for Node {
    fn from(node: ObjectNode) -> Self {
        Node::Object(node)
    }
}

impl From<PropertyNode> for Node {
    fn from(node: PropertyNode) -> Self {
        Node::Property(node)
    }
}

/// A comment. Rendered as `//text` unless the text spans several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    text: String,
}

impl CommentNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the text contains a line break (`\n` or `\r`).
    pub fn is_multiline(&self) -> bool {
        self.text.contains(['\n', '\r'])
    }
}

/// A named leaf holding one value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    name: String,
    value: Value,
}

impl PropertyNode {
    /// Create a property. The name is taken as is; see [`PropertyNode::try_new`].
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a property, failing with [`Error::InvalidName`] on an empty name.
    pub fn try_new(name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::new(checked_name(name)?, value))
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, Value::Boolean(value))
    }

    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self::new(name, Value::Integer(value))
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self::new(name, Value::Float(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Value::String(value.into()))
    }

    pub fn enumeration(name: impl Into<String>, value: impl ToString) -> Self {
        Self::new(name, Value::enumeration(value))
    }

    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }

    pub fn default_value(name: impl Into<String>) -> Self {
        Self::new(name, Value::Default)
    }

    pub fn array(name: impl Into<String>, array: Array) -> Self {
        Self::new(name, Value::Array(array))
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Property
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename this property. Names must be non-empty.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = checked_name(name)?;
        Ok(())
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn value_kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Fail with a type mismatch unless the value is of `kind`.
    pub fn ensure_value_kind(&self, kind: ValueKind) -> Result<()> {
        if self.value_kind() != kind {
            return Err(Error::value_kind(kind, self.value_kind()));
        }
        Ok(())
    }

    /// Fail unless this is an array whose items are of `kind`.
    ///
    /// A `Null` array has no item type of its own and satisfies any
    /// expectation.
    pub fn ensure_item_type(&self, kind: ValueKind) -> Result<()> {
        match &self.value {
            Value::Array(Array::Null) => Ok(()),
            Value::Array(array) if array.item_type() == kind => Ok(()),
            Value::Array(array) => Err(Error::TypeMismatch {
                expected: format!("array of {kind}"),
                found: format!("array of {}", array.item_type()),
            }),
            other => Err(Error::value_kind(ValueKind::Array, other.kind())),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, Value::Array(_))
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn is_default(&self) -> bool {
        self.value.is_default()
    }

    /// The integer value, failing if it is negative.
    pub fn unsigned_integer(&self) -> Result<u32> {
        let value = self
            .value
            .as_i32()
            .ok_or_else(|| Error::value_kind(ValueKind::Integer, self.value_kind()))?;
        u32::try_from(value).map_err(|_| Error::negative(value))
    }

    /// The float value, failing if it is negative.
    pub fn unsigned_float(&self) -> Result<f32> {
        let value = self
            .value
            .as_f32()
            .ok_or_else(|| Error::value_kind(ValueKind::Float, self.value_kind()))?;
        if value < 0.0 {
            return Err(Error::negative(value));
        }
        Ok(value)
    }

    /// Emit the property name followed by its value.
    pub fn events<V: Visitor + ?Sized>(&self, visitor: &mut V) -> EventResult<()> {
        visitor.property(&self.name)?;
        self.value.events(visitor)
    }
}

impl NamedNode for PropertyNode {
    fn name(&self) -> &str {
        PropertyNode::name(self)
    }

    fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        PropertyNode::set_name(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match() {
        assert!(names_match("Property1", "property1"));
        assert!(names_match("ÄRGER", "ärger"));
        assert!(!names_match("property1", "property2"));
        assert!(!names_match("prop", "property"));
    }

    #[test]
    fn test_comment_multiline() {
        assert!(!CommentNode::new("single").is_multiline());
        assert!(CommentNode::new("two\nlines").is_multiline());
        assert!(CommentNode::new("two\rlines").is_multiline());
    }

    #[test]
    fn test_ensure_kind() {
        let node = Node::from(PropertyNode::integer("p", 1));
        node.ensure_kind(NodeKind::Property).unwrap();
        let err = node.ensure_kind(NodeKind::Object).unwrap_err();
        assert_eq!(err.to_string(), "Expected node of type Object but got Property");
        assert_eq!(Node::from(ObjectNode::new("o")).kind(), NodeKind::Object);
        assert_eq!(Node::from(CommentNode::new("c")).kind(), NodeKind::Comment);
    }

    #[test]
    fn test_ensure_value_kind() {
        let property = PropertyNode::string("p", "x");
        property.ensure_value_kind(ValueKind::String).unwrap();
        assert!(property.ensure_value_kind(ValueKind::Enum).unwrap_err().is_type_mismatch());
    }

    #[test]
    fn test_ensure_item_type() {
        let ints = PropertyNode::array("p", Array::Integer(vec![1]));
        ints.ensure_item_type(ValueKind::Integer).unwrap();
        assert!(ints.ensure_item_type(ValueKind::Float).is_err());
        PropertyNode::array("p", Array::Null)
            .ensure_item_type(ValueKind::String)
            .unwrap();
        assert!(PropertyNode::integer("p", 1).ensure_item_type(ValueKind::Integer).is_err());
    }

    #[test]
    fn test_unsigned_views() {
        assert_eq!(PropertyNode::integer("p", 42).unsigned_integer().unwrap(), 42);
        let err = PropertyNode::integer("p", -1).unsigned_integer().unwrap_err();
        assert_eq!(err.to_string(), "Expected an unsigned value but got -1");
        assert_eq!(PropertyNode::float("p", 0.5).unsigned_float().unwrap(), 0.5);
        assert!(matches!(
            PropertyNode::float("p", -0.5).unsigned_float(),
            Err(Error::NegativeValue { .. })
        ));
        assert!(PropertyNode::null("p").unsigned_integer().unwrap_err().is_type_mismatch());
    }

    #[test]
    fn test_rename() {
        let mut property = PropertyNode::null("p");
        property.set_name("q").unwrap();
        assert_eq!(property.name(), "q");
        assert!(matches!(property.set_name(""), Err(Error::InvalidName(_))));
        assert_eq!(property.name(), "q");
    }

    #[test]
    fn test_checked_construction() {
        let property = PropertyNode::try_new("p", 1).unwrap();
        assert_eq!(property.value(), &Value::Integer(1));
        assert!(matches!(PropertyNode::try_new("", 1), Err(Error::InvalidName(_))));
        assert_eq!(ObjectNode::try_new("o").unwrap().name(), "o");
        assert!(matches!(ObjectNode::try_new(""), Err(Error::InvalidName(_))));
    }
}
